//! Alert throttling and notification delivery for pricegap.
//!
//! - `AlertThrottle`: global Armed/Cooling cooldown gate
//! - `AlertDispatcher`: fans a notice out to every registered sink and
//!   contains their failures
//! - `EmailSink`, `SmsSink`, `WebhookSink`: SMTP, Twilio and webhook delivery

pub mod config;
pub mod dispatcher;
pub mod email;
pub mod error;
pub mod sink;
pub mod sms;
pub mod throttle;
pub mod webhook;

pub use config::{AlertConfig, EmailConfig, SmsConfig, WebhookConfig, WebhookMethod};
pub use dispatcher::{AlertDispatcher, DispatchReport};
pub use email::EmailSink;
pub use error::{AlertError, AlertResult, SinkError, SinkResult};
pub use sink::{AlertNotice, NotificationSink};
pub use sms::SmsSink;
pub use throttle::{AlertThrottle, ThrottleDecision, ThrottleState};
pub use webhook::WebhookSink;
