use onesecmail_client::{Client, Context, Error, LogEvent, Mailbox};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Walk the demo mailbox: list, read, and download everything in it.
///
/// Set `RUST_LOG=onesecmail_client=debug` to see each request.
#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = Client::builder()
        .verbose_log(|event: &LogEvent<'_>| {
            tracing::trace!(kind = ?event.kind, url = event.url, status = ?event.status, "verbose");
        })
        .build()?;
    let ctx = Context::background().with_timeout(Duration::from_secs(5));

    let mailboxes = client.gen_random_mailbox(&ctx, 10).await?;
    println!("{mailboxes:?}");

    let domains = client.get_domain_list(&ctx).await?;
    println!("{domains:?}");

    if let Some(domain) = domains.first() {
        println!("local pick: {}", Mailbox::random(domain.as_str()));
    }

    let mailbox = Mailbox::new("demo", "1secmail.com");
    let messages = client
        .get_messages(&ctx, &mailbox.login, &mailbox.domain)
        .await?;
    for item in messages {
        println!("{item:?}");
        let message = client
            .read_message(&ctx, &mailbox.login, &mailbox.domain, item.id)
            .await?;
        println!("{message:?}");
        for attachment in &message.attachments {
            let data = client
                .download_attachment(
                    &ctx,
                    &mailbox.login,
                    &mailbox.domain,
                    item.id,
                    &attachment.filename,
                )
                .await?;
            println!("{attachment:?} {}", data.len());
        }
    }

    Ok(())
}
