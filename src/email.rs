/// Outbound mail seam. Delivery reliability is out of scope here; the
/// default implementation logs the message so local runs and tests can see
/// the OTP without a mail provider.
pub trait Mailer: Send + Sync {
    fn deliver(&self, to: &str, subject: &str, body: &str);
}

pub struct LogMailer;

impl Mailer for LogMailer {
    fn deliver(&self, to: &str, subject: &str, body: &str) {
        log::info!("mail to {}: {}: {}", to, subject, body);
    }
}
