use std::fmt;

use engine::Outcome;
use reqwest::{RequestBuilder, Response, Url};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    config::AppConfig,
    error::{ClientError, Result},
};

type Fetched<T> = std::result::Result<Outcome<T>, ClientError>;

/// JSON transport shared by every [`crate::RestRemote`].
///
/// Every request carries basic auth. A 2xx response decodes into
/// `Outcome::Success`, anything else becomes `Outcome::Failure` carrying the
/// response body verbatim.
#[derive(Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
    username: String,
    password: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl Client {
    pub fn new(base_url: &str, username: &str, password: &str) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            base_url,
            http,
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    pub fn from_config(settings: &AppConfig) -> Result<Self> {
        Self::new(&settings.base_url, &settings.username, &settings.password)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn get<Q, T>(&self, path: &str, query: &Q) -> Fetched<T>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let endpoint = self.endpoint(path)?;
        let res = self.send(self.http.get(endpoint).query(query)).await?;
        decode(res).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Fetched<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let endpoint = self.endpoint(path)?;
        let res = self.send(self.http.post(endpoint).json(body)).await?;
        decode(res).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Fetched<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let endpoint = self.endpoint(path)?;
        let res = self.send(self.http.put(endpoint).json(body)).await?;
        decode(res).await
    }

    /// Deletes a resource; the success body, if any, is ignored.
    pub async fn delete(&self, path: &str) -> Fetched<()> {
        let endpoint = self.endpoint(path)?;
        let res = self.send(self.http.delete(endpoint)).await?;
        let status = res.status();
        let text = res.text().await?;
        if status.is_success() {
            return Ok(Outcome::Success(()));
        }
        Ok(failure(status.as_u16(), &text))
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, ClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ClientError::InvalidUrl(format!("{path}: {err}")))
    }

    async fn send(&self, req: RequestBuilder) -> std::result::Result<Response, ClientError> {
        let res = req
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;
        tracing::debug!(status = %res.status(), url = %res.url(), "response");
        Ok(res)
    }
}

async fn decode<T: DeserializeOwned>(res: Response) -> Fetched<T> {
    let status = res.status();
    let text = res.text().await?;
    if status.is_success() {
        return Ok(Outcome::Success(serde_json::from_str(&text)?));
    }
    Ok(failure(status.as_u16(), &text))
}

fn failure<T>(status: u16, text: &str) -> Outcome<T> {
    tracing::warn!(status, "request rejected");
    Outcome::Failure {
        status,
        body: text.to_string(),
    }
}

/// Parses the base URL so that relative joins append to its path.
fn parse_base_url(raw: &str) -> std::result::Result<Url, ClientError> {
    let mut url =
        Url::parse(raw).map_err(|err| ClientError::InvalidUrl(format!("{raw}: {err}")))?;
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidUrl(format!("{raw}: not a base url")));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
