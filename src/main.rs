use clap::Parser;
use upload_progress::utils::error::ErrorSeverity;
use upload_progress::utils::{logger, validation::Validate};
use upload_progress::{
    BodyLoggingInterceptor, ProgressEvent, UploadClient, UploadConfig, UploadError,
};

fn format_progress(event: &ProgressEvent) -> String {
    match event.total {
        Some(total) if total > 0 => format!(
            "{:>5.1}% ({} / {} bytes)",
            event.progress as f64 * 100.0 / total as f64,
            event.progress,
            total
        ),
        _ => format!("{} bytes", event.progress),
    }
}

fn exit_code(e: &UploadError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = UploadConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    let prepared = config
        .load_profile()
        .and_then(|()| config.validate())
        .and_then(|()| config.to_request());
    let request = match prepared {
        Ok(request) => request,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(exit_code(&e));
        }
    };
    if config.verbose {
        tracing::debug!("Upload config: {:?}", config);
    }

    let mut client = UploadClient::new().channel_capacity(config.channel_capacity());
    if config.log_body {
        client = client.interceptor(BodyLoggingInterceptor::default());
    }

    let (events_tx, mut events_rx) = tokio::sync::mpsc::unbounded_channel::<ProgressEvent>();
    let json_events = config.json_events;
    let printer = tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            if json_events {
                println!("{}", event.to_json_line()?);
            } else {
                println!("⬆️  {}", format_progress(&event));
            }
        }
        Ok::<_, UploadError>(())
    });

    let result = client
        .upload_with_events(request, events_tx, config.progress_interval())
        .await;
    // 所有 sender 都已釋放，等待輸出完畢
    printer.await??;

    match result {
        Ok((_, response)) if response.is_success() => {
            println!("✅ Upload finished with status {}", response.status);
            if !response.body.is_empty() {
                println!("{}", response.body);
            }
            Ok(())
        }
        Ok((_, response)) => {
            tracing::error!("❌ Server answered {}", response.status);
            eprintln!("❌ Server answered {}: {}", response.status, response.body);
            std::process::exit(4);
        }
        Err(e) => {
            tracing::error!(
                "❌ Upload failed: {} (Severity: {:?})",
                e,
                e.severity()
            );
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(exit_code(&e));
        }
    }
}
