//! REST client for the listmonk HTTP API.
//!
//! Wraps the endpoints the executor needs (transactional sends,
//! subscriber upserts, campaign creation and scheduling) using
//! [`reqwest`] with basic auth.

use serde::Deserialize;
use serde_json::json;

use crate::error::ListmonkError;
use crate::{CampaignDraft, MailingList, SubscriberOutcome, SubscriberUpsert, TransactionalEmail};

/// HTTP client for a single listmonk instance.
pub struct ListmonkClient {
    client: reqwest::Client,
    api_url: String,
    username: String,
    password: String,
}

/// listmonk wraps every successful response in a `data` envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct SubscriberSearch {
    results: Vec<Subscriber>,
}

#[derive(Debug, Deserialize)]
struct Subscriber {
    id: i64,
    lists: Vec<ListRef>,
}

#[derive(Debug, Deserialize)]
struct ListRef {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct Campaign {
    id: i64,
}

impl ListmonkClient {
    /// Create a new client.
    ///
    /// * `api_url` - Base HTTP URL, e.g. `http://localhost:9000`.
    pub fn new(api_url: String, username: String, password: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            username,
            password,
        }
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}{}", self.api_url, path))
            .basic_auth(&self.username, Some(&self.password))
    }

    fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .put(format!("{}{}", self.api_url, path))
            .basic_auth(&self.username, Some(&self.password))
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}{}", self.api_url, path))
            .basic_auth(&self.username, Some(&self.password))
    }

    /// Ensure the response has a success status code, returning the
    /// status and body as an error otherwise.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ListmonkError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ListmonkError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ListmonkError> {
        let response = Self::ensure_success(response).await?;
        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| ListmonkError::UnexpectedResponse(e.to_string()))?;
        Ok(envelope.data)
    }

    /// Look up a subscriber by email. Returns `None` when unknown.
    async fn find_subscriber(&self, email: &str) -> Result<Option<Subscriber>, ListmonkError> {
        let query = format!("subscribers.email = '{}'", email.replace('\'', "''"));
        let response = self
            .get("/api/subscribers")
            .query(&[("query", query.as_str()), ("page", "1"), ("per_page", "1")])
            .send()
            .await?;
        let search: SubscriberSearch = Self::parse(response).await?;
        Ok(search.results.into_iter().next())
    }
}

#[async_trait::async_trait]
impl MailingList for ListmonkClient {
    async fn send_transactional_email(
        &self,
        email: &TransactionalEmail,
    ) -> Result<(), ListmonkError> {
        let mut body = json!({
            "subscriber_email": email.subscriber_email,
            "template_id": email.template_id,
            "data": email.data,
        });
        if !email.headers.is_empty() {
            body["headers"] = json!(email.headers);
        }

        let response = self.post("/api/tx").json(&body).send().await?;
        Self::ensure_success(response).await?;
        tracing::debug!(
            template_id = email.template_id,
            subscriber = %email.subscriber_email,
            "transactional email sent"
        );
        Ok(())
    }

    async fn upsert_subscriber(
        &self,
        subscriber: &SubscriberUpsert,
    ) -> Result<SubscriberOutcome, ListmonkError> {
        let body = json!({
            "email": subscriber.email,
            "name": subscriber.name,
            "status": subscriber.status,
            "lists": subscriber.lists,
            "attribs": subscriber.attribs,
            "preconfirm_subscriptions": true,
        });

        let response = self.post("/api/subscribers").json(&body).send().await?;
        if response.status().as_u16() != 409 {
            Self::ensure_success(response).await?;
            return Ok(SubscriberOutcome::Created);
        }

        // Already subscribed: merge the target lists onto the existing
        // record instead of failing the action.
        let existing = self
            .find_subscriber(&subscriber.email)
            .await?
            .ok_or_else(|| {
                ListmonkError::UnexpectedResponse(format!(
                    "subscriber {} reported as duplicate but not found",
                    subscriber.email
                ))
            })?;

        let mut lists: Vec<i64> = existing.lists.iter().map(|l| l.id).collect();
        for id in &subscriber.lists {
            if !lists.contains(id) {
                lists.push(*id);
            }
        }

        let body = json!({
            "email": subscriber.email,
            "name": subscriber.name,
            "status": subscriber.status,
            "lists": lists,
            "attribs": subscriber.attribs,
            "preconfirm_subscriptions": true,
        });
        let response = self
            .put(&format!("/api/subscribers/{}", existing.id))
            .json(&body)
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(SubscriberOutcome::Updated)
    }

    async fn create_campaign(&self, draft: &CampaignDraft) -> Result<i64, ListmonkError> {
        let body = json!({
            "name": draft.name,
            "subject": draft.subject,
            "body": draft.body,
            "lists": draft.lists,
            "template_id": draft.template_id,
            "type": "regular",
            "content_type": draft.content_type,
            "send_at": draft.send_at.to_rfc3339(),
        });

        let response = self.post("/api/campaigns").json(&body).send().await?;
        let campaign: Campaign = Self::parse(response).await?;

        // A created campaign sits in draft until its status flips.
        let response = self
            .put(&format!("/api/campaigns/{}/status", campaign.id))
            .json(&json!({ "status": "scheduled" }))
            .send()
            .await?;
        Self::ensure_success(response).await?;

        tracing::info!(campaign_id = campaign.id, name = %draft.name, "campaign scheduled");
        Ok(campaign.id)
    }
}
