use super::{ObjectStore, StorageError};
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

/// Object store backed by an S3-compatible bucket.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: S3Client,
    bucket: String,
    public_base_url: String,
}

impl S3ObjectStore {
    /// Build a client from the default AWS credential/region chain.
    ///
    /// A custom `endpoint` (MinIO, R2, ...) switches to path-style addressing.
    pub async fn connect(bucket: String, endpoint: Option<String>, public_base_url: String) -> Self {
        let region_provider = RegionProviderChain::default_provider().or_else("us-east-1");
        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(region_provider)
            .load()
            .await;
        let mut builder = aws_sdk_s3::config::Builder::from(&aws_config);

        if let Some(endpoint) = endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self {
            client: S3Client::from_conf(builder.build()),
            bucket,
            public_base_url,
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn provider(&self) -> &'static str {
        "s3"
    }

    async fn put(&self, key: &str, content_type: &str, bytes: Bytes) -> Result<String, StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::Remote(format!("put_object {key}: {e}")))?;

        Ok(build_public_url(&self.public_base_url, &self.bucket, key))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let page = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| StorageError::Remote(format!("list_objects_v2 {prefix}: {e}")))?;

            keys.extend(page.contents().iter().filter_map(|o| o.key().map(str::to_string)));

            match page.next_continuation_token() {
                Some(token) if page.is_truncated().unwrap_or(false) => {
                    continuation = Some(token.to_string())
                }
                _ => break,
            }
        }

        Ok(keys)
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Remote(format!("delete_object {key}: {e}")))?;
        Ok(())
    }
}

/// Public URL for `key`.
///
/// `base` may be a template (`https://cdn/{bucket}/{key}`), already include the
/// bucket, or be a bare host, in which case the bucket is appended.
pub fn build_public_url(base: &str, bucket: &str, key: &str) -> String {
    let trimmed = base.trim_end_matches('/');

    if trimmed.contains("{bucket}") || trimmed.contains("{key}") {
        return trimmed.replace("{bucket}", bucket).replace("{key}", key);
    }

    if trimmed.contains(bucket) {
        format!("{trimmed}/{key}")
    } else {
        format!("{trimmed}/{bucket}/{key}")
    }
}

#[cfg(test)]
mod tests {
    use super::build_public_url;

    #[test]
    fn public_url_with_bucket_in_host() {
        assert_eq!(
            build_public_url("https://leads.s3.amazonaws.com/", "leads", "bwm/a/x.pdf"),
            "https://leads.s3.amazonaws.com/bwm/a/x.pdf"
        );
    }

    #[test]
    fn public_url_for_path_style_endpoint() {
        assert_eq!(
            build_public_url("http://minio:9000", "leads", "bwm/a/x.pdf"),
            "http://minio:9000/leads/bwm/a/x.pdf"
        );
    }

    #[test]
    fn public_url_template() {
        assert_eq!(
            build_public_url("https://cdn.example.com/{bucket}/{key}", "leads", "k.png"),
            "https://cdn.example.com/leads/k.png"
        );
    }
}
