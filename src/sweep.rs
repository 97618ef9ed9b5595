use rand::Rng;
use std::thread;
use std::time::Duration;

use crate::botlog::BotLog;
use crate::mail::gmail_client::{Mailbox, MailboxError};

/// Blocking pause between operations; a seam so backoff is testable.
pub trait Delay {
    fn pause(&mut self, d: Duration);
}

pub struct ThreadDelay;

impl Delay for ThreadDelay {
    fn pause(&mut self, d: Duration) {
        thread::sleep(d);
    }
}

/// Query matching all mail from `sender`, spam folder included.
pub fn sender_query(sender: &str) -> String {
    format!("from:{sender} OR (label:spam from:{sender})")
}

/// Uniform random backoff in [1, 10] seconds.
fn backoff_duration<R: Rng>(rng: &mut R) -> Duration {
    Duration::from_secs_f64(rng.gen_range(1.0..=10.0))
}

/// Delete every message matching `sender`, including spam. Failures never
/// abort the pass: transient errors back off and move on (the next pass
/// re-finds the message), precondition failures are skipped, everything
/// else is logged.
pub fn sweep_sender(
    mailbox: &dyn Mailbox,
    sender: &str,
    log: &mut BotLog,
    delay: &mut dyn Delay,
) {
    let query = sender_query(sender);
    let messages = match mailbox.search(&query) {
        Ok(m) => m,
        Err(e) => {
            log.error(format!("An error occurred: {e}"));
            return;
        }
    };

    if messages.is_empty() {
        log.info(format!("No emails found from {sender}"));
        return;
    }

    for message in &messages {
        match mailbox.delete(message) {
            Ok(()) => {
                log.info(format!("Deleted email with ID: {}", message.id));
            }
            Err(MailboxError::Transient { status }) => {
                log.warn(format!(
                    "Rate limit or server error occurred (status {status})"
                ));
                let backoff = backoff_duration(&mut rand::thread_rng());
                log.info(format!("Retrying in {:.2} seconds...", backoff.as_secs_f64()));
                delay.pause(backoff);
            }
            Err(MailboxError::Precondition) => {
                log.warn(format!(
                    "Skipping email with ID {} due to precondition failure.",
                    message.id
                ));
            }
            Err(e) => {
                log.error(format!("An error occurred: {e}"));
            }
        }
    }
}

/// One full pass over every configured sender, in order.
pub fn run_pass(
    mailbox: &dyn Mailbox,
    senders: &[String],
    log: &mut BotLog,
    delay: &mut dyn Delay,
) {
    for sender in senders {
        sweep_sender(mailbox, sender, log, delay);
    }
}
