//! Notification body construction.
//!
//! Delivery is out of scope; this module only loads the mail settings and
//! renders the announcement text a sender would ship.

use crate::repo::config_repo::ConfigRepository;
use crate::repo::RepoResult;

/// Mail settings read from config references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConfig {
    pub smtp: String,
    pub port: i64,
    pub from: String,
    pub cc: String,
    pub subject: String,
    pub to: String,
}

impl EmailConfig {
    /// Loads the six `email_*` reference rows; any missing row fails with
    /// `ConfigNotFound`.
    pub fn load<C: ConfigRepository>(config: &C) -> RepoResult<Self> {
        Ok(Self {
            smtp: config.get_str("email_smtp")?,
            port: config.get_int("email_port")?,
            from: config.get_str("email_from")?,
            cc: config.get_str("email_cc")?,
            subject: config.get_str("email_subject")?,
            to: config.get_str("email_to")?,
        })
    }
}

/// Renders the announcement body around the newline-joined pairing lines.
pub fn make_email_body(meetings: &str, test_message: bool) -> String {
    let mut body = String::from(
        "Good day, \n\n below is the list of meetings for the following 2 weeks:\n\n",
    );
    body.push_str(meetings);
    body.push_str("\n\nMay your coffee be strong and your Mondays short,\n\n BrewPair");
    if test_message {
        body.push_str("\n\n NB - this is only a test message");
    }
    body
}
