#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::FixedOffset;
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::sync::Mutex;
use tower::ServiceExt;

use cinema_booking_api::{
    app,
    error::{AppError, AppResult},
    mailer::Notifier,
    media::MediaStore,
    models::{
        media_model::{MediaKind, MediaRef, UploadedFile},
        reservation_model::Reservation,
    },
    store::MemoryStore,
    AppState,
};

/// Media store that hands out sequential ids and records every call.
#[derive(Default)]
pub struct RecordingMediaStore {
    next_id: AtomicUsize,
    pub uploads: Mutex<Vec<(String, MediaKind)>>,
    pub destroyed: Mutex<Vec<(String, MediaKind)>>,
    pub fail_uploads: AtomicBool,
    /// Uploads into this folder fail; others succeed.
    pub failing_folder: Mutex<Option<String>>,
    pub fail_destroys: AtomicBool,
}

#[async_trait]
impl MediaStore for RecordingMediaStore {
    async fn upload(&self, _file: &UploadedFile, folder: &str, kind: MediaKind) -> AppResult<MediaRef> {
        let folder_fails = self.failing_folder.lock().await.as_deref() == Some(folder);
        if folder_fails || self.fail_uploads.load(Ordering::SeqCst) {
            return Err(AppError::Upstream("media store unavailable".into()));
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let public_id = format!("{}/asset-{}", folder, n);
        self.uploads.lock().await.push((folder.to_string(), kind));
        Ok(MediaRef {
            url: format!("https://media.test/{}", public_id),
            public_id,
        })
    }

    async fn destroy(&self, public_id: &str, kind: MediaKind) -> AppResult<()> {
        self.destroyed.lock().await.push((public_id.to_string(), kind));
        if self.fail_destroys.load(Ordering::SeqCst) {
            return Err(AppError::Upstream("destroy refused".into()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<String>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn reservation_created(&self, reservation: &Reservation) -> AppResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Upstream("Failed to send reservation email".into()));
        }
        self.sent.lock().await.push(reservation.email.clone());
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub media: Arc<RecordingMediaStore>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn build_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let media = Arc::new(RecordingMediaStore::default());
    let notifier = Arc::new(RecordingNotifier::default());

    let router = app(AppState {
        store: store.clone(),
        media: media.clone(),
        notifier: notifier.clone(),
        show_offset: FixedOffset::east_opt(0).unwrap(),
    });

    TestApp {
        router,
        store,
        media,
        notifier,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn json(&self, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn empty(&self, method: Method, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn multipart(&self, method: Method, uri: &str, form: Multipart) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(form.finish()))
            .unwrap();
        self.send(request).await
    }
}

const BOUNDARY: &str = "cinema-test-boundary";

/// Minimal `multipart/form-data` body builder.
#[derive(Default)]
pub struct Multipart {
    body: Vec<u8>,
}

impl Multipart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, name, file_name, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        self.body
    }
}
