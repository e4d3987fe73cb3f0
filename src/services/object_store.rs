use std::path::Path;

use chrono::Utc;
use futures_util::StreamExt;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;

use crate::models::config::AppConfig;
use crate::services::download::staging_path;

type HmacSha256 = Hmac<Sha256>;

const REGION: &str = "us-east-1";
const SERVICE: &str = "s3";
const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

/// Minimal S3-compatible client: authenticated single-object GET, which is
/// all the weight fallback needs. Requests are signed with AWS Signature
/// Version 4 over an unsigned payload.
pub struct ObjectStoreClient {
    client: reqwest::Client,
    endpoint: String,
    access_key: String,
    secret_key: String,
    secure: bool,
}

impl ObjectStoreClient {
    /// Returns `None` unless both credentials are configured; without them
    /// the fallback source is simply unavailable.
    pub fn from_config(config: &AppConfig) -> Option<Self> {
        if config.minio_access_key.is_empty() || config.minio_secret_key.is_empty() {
            return None;
        }
        Some(Self {
            client: reqwest::Client::new(),
            endpoint: config.minio_endpoint.clone(),
            access_key: config.minio_access_key.clone(),
            secret_key: config.minio_secret_key.clone(),
            secure: config.minio_secure,
        })
    }

    /// Fetch `bucket/key` to `dest`, streaming through a `.part` staging
    /// path and renaming on completion. `dest` only ever holds a complete
    /// object, so the provisioner's skip-if-exists check stays sound.
    pub async fn fetch_object(&self, bucket: &str, key: &str, dest: &Path) -> anyhow::Result<()> {
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let scheme = if self.secure { "https" } else { "http" };
        let path = format!("/{}/{}", bucket, uri_encode_path(key));
        let url = format!("{}://{}{}", scheme, self.endpoint, path);

        let now = Utc::now();
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date = now.format("%Y%m%d").to_string();

        let authorization = self.authorization_header(&path, &amz_date, &date);

        let response = self
            .client
            .get(&url)
            .header("Host", &self.endpoint)
            .header("x-amz-date", &amz_date)
            .header("x-amz-content-sha256", UNSIGNED_PAYLOAD)
            .header("Authorization", authorization)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| anyhow::anyhow!("Object fetch failed for {}/{}: {e}", bucket, key))?;

        let part_path = staging_path(dest);
        let mut file = tokio::fs::File::create(&part_path).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            file.write_all(&chunk?).await?;
        }
        file.flush().await?;
        tokio::fs::rename(&part_path, dest).await?;

        Ok(())
    }

    fn authorization_header(&self, path: &str, amz_date: &str, date: &str) -> String {
        let canonical_headers = format!(
            "host:{}\nx-amz-content-sha256:{}\nx-amz-date:{}\n",
            self.endpoint, UNSIGNED_PAYLOAD, amz_date
        );
        let signed_headers = "host;x-amz-content-sha256;x-amz-date";

        let canonical_request = format!(
            "GET\n{}\n\n{}\n{}\n{}",
            path, canonical_headers, signed_headers, UNSIGNED_PAYLOAD
        );

        let scope = format!("{}/{}/{}/aws4_request", date, REGION, SERVICE);
        let string_to_sign = format!(
            "AWS4-HMAC-SHA256\n{}\n{}\n{}",
            amz_date,
            scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let signing_key = derive_signing_key(&self.secret_key, date);
        let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes()));

        format!(
            "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
            self.access_key, scope, signed_headers, signature
        )
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

fn derive_signing_key(secret_key: &str, date: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{}", secret_key).as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, REGION.as_bytes());
    let k_service = hmac_sha256(&k_region, SERVICE.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

/// Percent-encode an object key for the canonical URI. Unreserved
/// characters and `/` stay literal; everything else is encoded.
fn uri_encode_path(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
