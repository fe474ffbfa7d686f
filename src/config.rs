use dotenvy::dotenv;
use std::env;

/// Which storage backend holds the demandes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// Single JSON document on disk
    File,
    /// MySQL via sqlx
    MySql,
}

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    pub storage: StorageKind,
    pub database_url: Option<String>,
    pub data_path: String,
    pub admin_password: String,

    // Notification transport; missing credentials disable the mailer
    pub smtp_relay: String,
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,
    pub mail_sender: String,

    // Rate limiting
    pub rate_submit_per_min: u32,
    pub rate_login_per_min: u32,

    pub api_prefix: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let storage = match env::var("STORAGE")
            .unwrap_or_else(|_| "file".to_string())
            .as_str()
        {
            "mysql" => StorageKind::MySql,
            _ => StorageKind::File,
        };

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            storage,
            database_url: env::var("DATABASE_URL").ok(),
            data_path: env::var("DATA_PATH").unwrap_or_else(|_| "data.json".to_string()),
            admin_password: env::var("ADMIN_PASSWORD").expect("ADMIN_PASSWORD must be set"),

            smtp_relay: env::var("SMTP_RELAY").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            smtp_user: env::var("SMTP_USER").ok(),
            smtp_pass: env::var("SMTP_PASS").ok(),
            mail_sender: env::var("MAIL_SENDER").unwrap_or_else(|_| "Service RH".to_string()),

            rate_submit_per_min: env::var("RATE_SUBMIT_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            rate_login_per_min: env::var("RATE_LOGIN_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
        }
    }
}
