use axum::{
    body::Body,
    http::{Request, header},
};

pub const BOUNDARY: &str = "----BoundaryTest";

/// Hand-built `multipart/form-data` body.
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend(format!("--{}\r\n", BOUNDARY).as_bytes());
        self.body.extend(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        self.body.extend(value.as_bytes());
        self.body.extend(b"\r\n");
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, content: &[u8]) -> Self {
        self.body.extend(format!("--{}\r\n", BOUNDARY).as_bytes());
        self.body.extend(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                name, filename, content_type
            )
            .as_bytes(),
        );
        self.body.extend(content);
        self.body.extend(b"\r\n");
        self
    }

    pub fn into_bytes(mut self) -> Vec<u8> {
        self.body.extend(format!("--{}--\r\n", BOUNDARY).as_bytes());
        self.body
    }

    /// A `POST` to `uri` carrying this body.
    pub fn into_request(self, uri: &str) -> Request<Body> {
        let body = self.into_bytes();
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .header(header::CONTENT_LENGTH, body.len())
            .body(Body::from(body))
            .unwrap()
    }
}
