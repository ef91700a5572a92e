use anyhow::Result;
use log::debug;
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};

use crate::{
    github::{GetRelease, GitHub},
    http::HttpClient,
    runtime::Runtime,
};

const USER_AGENT: &str = "imhex-downloads";

pub struct Config<R: Runtime, G: GetRelease> {
    pub runtime: R,
    pub github: G,
    pub http_client: HttpClient,
}

impl<R: Runtime> Config<R, GitHub> {
    pub fn new(runtime: R, api_url: Option<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Ok(token) = runtime.env_var("GITHUB_TOKEN") {
            let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))?;
            auth_value.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth_value);
            debug!("Using GITHUB_TOKEN for authentication");
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        let http_client = HttpClient::new(client);
        let github = GitHub::new(http_client.clone(), api_url);

        Ok(Self {
            runtime,
            github,
            http_client,
        })
    }
}
