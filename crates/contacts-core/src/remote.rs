//! Remote contact store
//!
//! The store is a plain REST collection:
//!
//! - `GET    {base}/ContactLists`      -> `[Contact]`
//! - `POST   {base}/ContactLists`      -> `Contact`
//! - `PUT    {base}/ContactLists/{id}` -> `Contact`
//! - `DELETE {base}/ContactLists/{id}` -> body ignored
//!
//! Every call makes exactly one attempt. There is no retry, backoff or
//! timeout; any failure becomes a `FetchError`.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{FetchError, Operation};
use crate::models::{Contact, NewContact};

/// Collection path appended to the base URL
pub const COLLECTION_PATH: &str = "ContactLists";

/// Operations against the remote contact collection
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Fetch every contact, in the order the store returns them
    async fn list_all(&self) -> Result<Vec<Contact>, FetchError>;

    /// Create a contact; the store assigns the id
    async fn create(&self, contact: &NewContact) -> Result<Contact, FetchError>;

    /// Replace name and phone of an existing contact
    async fn update(&self, id: &str, contact: &NewContact) -> Result<Contact, FetchError>;

    /// Delete a contact
    async fn remove(&self, id: &str) -> Result<(), FetchError>;
}

/// `ContactStore` over HTTP
pub struct RestContactStore {
    client: Client,
    collection_url: String,
}

impl RestContactStore {
    /// Create a client for the collection under `base_url`
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("contacts/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::from_reqwest(Operation::List, e))?;

        Ok(Self {
            client,
            collection_url: format!("{}/{}", base_url.trim_end_matches('/'), COLLECTION_PATH),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Self::new(&config.api_url)
    }

    pub fn collection_url(&self) -> &str {
        &self.collection_url
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url, id)
    }
}

#[async_trait]
impl ContactStore for RestContactStore {
    async fn list_all(&self) -> Result<Vec<Contact>, FetchError> {
        debug!("GET {}", self.collection_url);
        let result = self.client.get(&self.collection_url).send().await;
        let contacts: Vec<Contact> = decode(Operation::List, result).await?;
        debug!("Fetched {} contacts", contacts.len());
        Ok(contacts)
    }

    async fn create(&self, contact: &NewContact) -> Result<Contact, FetchError> {
        debug!("POST {}", self.collection_url);
        let result = self
            .client
            .post(&self.collection_url)
            .json(contact)
            .send()
            .await;
        decode(Operation::Create, result).await
    }

    async fn update(&self, id: &str, contact: &NewContact) -> Result<Contact, FetchError> {
        let url = self.item_url(id);
        debug!("PUT {}", url);
        let result = self.client.put(&url).json(contact).send().await;
        decode(Operation::Update, result).await
    }

    async fn remove(&self, id: &str) -> Result<(), FetchError> {
        let url = self.item_url(id);
        debug!("DELETE {}", url);
        let result = self.client.delete(&url).send().await;
        check_status(Operation::Remove, result)?;
        Ok(())
    }
}

/// Collapse transport errors and non-success statuses into `FetchError`
fn check_status(
    operation: Operation,
    result: reqwest::Result<Response>,
) -> Result<Response, FetchError> {
    let response = result.map_err(|e| {
        warn!("{} failed: {}", operation, e);
        FetchError::from_reqwest(operation, e)
    })?;

    let status = response.status();
    if !status.is_success() {
        warn!("{} returned {}", operation, status);
        return Err(FetchError::new(operation, format!("HTTP {}", status)));
    }
    Ok(response)
}

/// Check the status and decode a JSON body
async fn decode<T: DeserializeOwned>(
    operation: Operation,
    result: reqwest::Result<Response>,
) -> Result<T, FetchError> {
    let response = check_status(operation, result)?;
    response.json::<T>().await.map_err(|e| {
        warn!("{}: invalid response body: {}", operation, e);
        FetchError::from_reqwest(operation, e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn store_for(server: &MockServer) -> RestContactStore {
        RestContactStore::new(&server.uri()).unwrap()
    }

    #[test]
    fn test_collection_url() {
        let store = RestContactStore::new("https://example.com/api/").unwrap();
        assert_eq!(store.collection_url(), "https://example.com/api/ContactLists");
        assert_eq!(store.item_url("7"), "https://example.com/api/ContactLists/7");
    }

    #[tokio::test]
    async fn test_list_all_preserves_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ContactLists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "2", "name": "Bob", "phone": "456"},
                {"id": "1", "name": "Ada", "phone": "123"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let contacts = store_for(&server).await.list_all().await.unwrap();
        let ids: Vec<_> = contacts.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }

    #[tokio::test]
    async fn test_list_all_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ContactLists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let contacts = store_for(&server).await.list_all().await.unwrap();
        assert!(contacts.is_empty());
    }

    #[tokio::test]
    async fn test_list_all_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ContactLists"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let err = store_for(&server).await.list_all().await.unwrap_err();
        assert_eq!(err.operation, Operation::List);
        assert!(err.details.contains("503"));
    }

    #[tokio::test]
    async fn test_create_sends_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ContactLists"))
            .and(body_json(json!({"name": "Ada", "phone": "123"})))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({"id": "7", "name": "Ada", "phone": "123"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let body = NewContact {
            name: "Ada".to_string(),
            phone: "123".to_string(),
        };
        let created = store_for(&server).await.create(&body).await.unwrap();
        assert_eq!(created, Contact::new("7", "Ada", "123"));
    }

    #[tokio::test]
    async fn test_create_single_attempt_on_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ContactLists"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let body = NewContact {
            name: "Ada".to_string(),
            phone: "123".to_string(),
        };
        let err = store_for(&server).await.create(&body).await.unwrap_err();
        assert_eq!(err.operation, Operation::Create);
        // `expect(1)` is verified when the server drops
    }

    #[tokio::test]
    async fn test_update_puts_to_item() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/ContactLists/7"))
            .and(body_json(json!({"name": "Ada L", "phone": "124"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": "7", "name": "Ada L", "phone": "124"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let body = NewContact {
            name: "Ada L".to_string(),
            phone: "124".to_string(),
        };
        let updated = store_for(&server).await.update("7", &body).await.unwrap();
        assert_eq!(updated.name, "Ada L");
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/ContactLists/404"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let body = NewContact {
            name: "Ada".to_string(),
            phone: "1".to_string(),
        };
        let err = store_for(&server).await.update("404", &body).await.unwrap_err();
        assert_eq!(err.operation, Operation::Update);
    }

    #[tokio::test]
    async fn test_invalid_json_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ContactLists"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = store_for(&server).await.list_all().await.unwrap_err();
        assert_eq!(err.operation, Operation::List);
    }

    #[tokio::test]
    async fn test_remove_ignores_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/ContactLists/7"))
            .respond_with(ResponseTemplate::new(200).set_body_string("whatever"))
            .expect(1)
            .mount(&server)
            .await;

        store_for(&server).await.remove("7").await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_failure() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/ContactLists/7"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = store_for(&server).await.remove("7").await.unwrap_err();
        assert_eq!(err.operation, Operation::Remove);
    }

    #[tokio::test]
    async fn test_connection_refused_is_fetch_error() {
        // Nothing listens on port 9 (discard) on test hosts
        let store = RestContactStore::new("http://127.0.0.1:9").unwrap();
        let err = store.list_all().await.unwrap_err();
        assert_eq!(err.operation, Operation::List);
    }
}
