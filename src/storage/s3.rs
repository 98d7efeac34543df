use aws_config::retry::RetryConfig;
use aws_config::BehaviorVersion;
use aws_sdk_s3 as s3;
use bytes::Bytes;
use s3::primitives::ByteStream;

use super::Storage;
use crate::AppError;

#[derive(Clone)]
pub struct S3Storage {
    client: s3::Client,
    bucket: String,
    prefix: Option<String>,
}

impl S3Storage {
    pub async fn new(
        bucket: &str,
        region: Option<&str>,
        endpoint: Option<&str>,
        prefix: Option<&str>,
    ) -> Self {
        let client = {
            // failures surface once; the caller decides whether to try again
            let mut config_loader =
                aws_config::defaults(BehaviorVersion::latest()).retry_config(RetryConfig::disabled());
            if let Some(region) = region {
                config_loader = config_loader.region(s3::config::Region::new(region.to_owned()));
            }
            if let Some(endpoint) = endpoint {
                config_loader = config_loader.endpoint_url(endpoint);
            }
            let sdk_config = config_loader.load().await;

            // custom endpoints (MinIO, GCS interop) generally need path-style addressing
            let s3_config = s3::config::Builder::from(&sdk_config)
                .force_path_style(endpoint.is_some())
                .build();

            s3::Client::from_conf(s3_config)
        };

        S3Storage {
            client,
            bucket: bucket.into(),
            prefix: prefix
                .map(|p| p.trim_matches('/').to_owned())
                .filter(|p| !p.is_empty()),
        }
    }

    fn full_key(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}/{key}"),
            None => key.to_owned(),
        }
    }
}

impl Storage for S3Storage {
    async fn get_object(&mut self, key: &str) -> crate::AppResult<Bytes> {
        let object = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(self.full_key(key))
            .send()
            .await?;
        let bytes = object
            .body
            .collect()
            .await
            .map_err(AppError::storage)?
            .into_bytes();
        Ok(bytes)
    }

    async fn put_object(&mut self, key: &str, data: Bytes) -> crate::AppResult<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(self.full_key(key))
            .content_type("application/json")
            .body(ByteStream::from(data))
            .send()
            .await?;
        Ok(())
    }
}
