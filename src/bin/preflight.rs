use portfolio_contact_relay::{Config, MailTransport, SmtpMailer};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight\n\
         \n\
         Requires env vars:\n\
           SMTP_USER, SMTP_PASS\n\
         Optional:\n\
           SMTP_HOST, SMTP_PORT, CONTACT_EMAIL, MAIL_FROM_NAME, APP_ENV\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    // Force-read config (nice error messages if malformed)
    let config = Config::from_env()?;

    println!("> Preflight:");
    println!("  APP_ENV={}", config.environment.as_str());
    println!("  SMTP_HOST={}", config.smtp.host);
    println!("  SMTP_PORT={} (secure={})", config.smtp.port, config.smtp.secure);
    println!("  MAIL_FROM_NAME={}", config.from_name);
    match config.recipient() {
        Some(r) => println!("  Recipient: {}", r),
        None => println!("  Recipient: <unset>"),
    }

    let mailer = SmtpMailer::from_config(&config.smtp, config.environment)?.ok_or_else(|| {
        anyhow::anyhow!("SMTP_USER and SMTP_PASS must both be set; the relay would answer 500")
    })?;

    println!("  Verifying connection to {} ...", mailer.endpoint());
    mailer
        .verify()
        .await
        .map_err(|e| anyhow::anyhow!("SMTP verification failed ({:?}): {}", e.kind, e))?;
    println!("  SMTP connection and credentials verified.");

    if config.hosted.is_some() {
        println!("  Hosted delivery channel configured (EMAILJS_*).");
    }

    println!("> Preflight OK.");
    Ok(())
}
