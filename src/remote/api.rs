use crate::todo::models::TodoItem;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const API_KEY_HEADER: &str = "x-api-key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("the server rejected the API key")]
    Unauthorized,
    #[error("todo not found")]
    NotFound,
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("could not decode server response: {0}")]
    Decode(String),
}

/// Body for create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodo {
    pub title: String,
    pub completed: bool,
}

impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            completed: false,
        }
    }
}

impl From<&TodoItem> for NewTodo {
    fn from(item: &TodoItem) -> Self {
        Self {
            title: item.title.clone(),
            completed: item.completed,
        }
    }
}

pub trait TodoApi {
    fn list(&self) -> Result<Vec<TodoItem>, ApiError>;
    fn create(&self, todo: &NewTodo) -> Result<TodoItem, ApiError>;
    fn update(&self, id: &str, todo: &NewTodo) -> Result<TodoItem, ApiError>;
    fn delete(&self, id: &str) -> Result<(), ApiError>;
}

impl<T: TodoApi + ?Sized> TodoApi for Box<T> {
    fn list(&self) -> Result<Vec<TodoItem>, ApiError> {
        (**self).list()
    }

    fn create(&self, todo: &NewTodo) -> Result<TodoItem, ApiError> {
        (**self).create(todo)
    }

    fn update(&self, id: &str, todo: &NewTodo) -> Result<TodoItem, ApiError> {
        (**self).update(id, todo)
    }

    fn delete(&self, id: &str) -> Result<(), ApiError> {
        (**self).delete(id)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    title: String,
}

#[derive(Debug, Clone)]
pub struct HttpTodoApi {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpTodoApi {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .map_err(|e| ApiError::Request(e.to_string()))?;

        debug!(status = response.status().as_u16(), url = %response.url(), "api response");

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::Unauthorized),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            status => {
                let body = response.text().unwrap_or_default();
                Err(ApiError::Status {
                    status: status.as_u16(),
                    message: error_message(&body),
                })
            }
        }
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|response| response.errors.into_iter().next())
        .map_or_else(|| body.to_string(), |entry| entry.title)
}

impl TodoApi for HttpTodoApi {
    fn list(&self) -> Result<Vec<TodoItem>, ApiError> {
        self.send(self.client.get(self.url("/todos/")))?
            .json()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn create(&self, todo: &NewTodo) -> Result<TodoItem, ApiError> {
        self.send(self.client.post(self.url("/todos")).json(todo))?
            .json()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn update(&self, id: &str, todo: &NewTodo) -> Result<TodoItem, ApiError> {
        self.send(self.client.put(self.url(&format!("/todos/{}", id))).json(todo))?
            .json()
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.send(self.client.delete(self.url(&format!("/todos/{}", id))))?;
        Ok(())
    }
}
