use chrono::{DateTime, Utc};

pub const CLIENT_TIME_HEADER: &str = "X-Client-Time";
pub const CLIENT_HASH_HEADER: &str = "X-Client-Hash";

/// The `X-Client-Time` / `X-Client-Hash` pair the token endpoint requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSignature {
    pub time: String,
    pub hash: String,
}

impl ClientSignature {
    pub fn headers(&self) -> [(&'static str, &str); 2] {
        [
            (CLIENT_TIME_HEADER, self.time.as_str()),
            (CLIENT_HASH_HEADER, self.hash.as_str()),
        ]
    }
}

/// Format a UTC instant as `YYYY-MM-DDTHH:MM:SS+00:00`.
pub fn client_time(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S+00:00").to_string()
}

/// Sign for a given instant: hex MD5 of the formatted time followed by the secret.
pub fn sign_at(now: DateTime<Utc>, hash_secret: &str) -> ClientSignature {
    let time = client_time(now);
    let hash = format!("{:x}", md5::compute(format!("{time}{hash_secret}")));
    ClientSignature { time, hash }
}

/// Sign for the current wall-clock time. Never cached: the endpoint only
/// accepts times inside its own tolerance window.
pub fn sign(hash_secret: &str) -> ClientSignature {
    sign_at(Utc::now(), hash_secret)
}
