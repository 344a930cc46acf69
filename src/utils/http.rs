use once_cell::sync::Lazy;
use reqwest::Client;
use std::time::Duration;

// No overall client timeout: every operation carries its own deadline at the
// call site, raced against the cancellation token.
static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to build HTTP client")
});

pub fn get_http_client() -> &'static Client {
    &HTTP_CLIENT
}
