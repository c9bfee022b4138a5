use crate::error::Result;
use async_trait::async_trait;
use seqmirror_core::Envelope;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Remote actions the sync engine consumes.
///
/// Every action resolves to the controller's uniform envelope; a transport or
/// decode failure surfaces as `Err`, a service-level rejection as an envelope
/// with `success == false`. Subsystem payloads stay untyped because the
/// engine mirrors them verbatim.
#[async_trait]
pub trait SequencerApi: Send + Sync {
    async fn version(&self) -> Result<Envelope<String>>;

    async fn sequence_state(&self) -> Result<Envelope<Value>>;
    async fn sequence_json(&self) -> Result<Envelope<Value>>;
    async fn image_history(&self) -> Result<Envelope<Value>>;

    async fn camera_info(&self) -> Result<Envelope<Value>>;
    async fn mount_info(&self) -> Result<Envelope<Value>>;
    async fn filter_info(&self) -> Result<Envelope<Value>>;
    async fn focuser_info(&self) -> Result<Envelope<Value>>;
    async fn focuser_autofocus_info(&self) -> Result<Envelope<Value>>;
    async fn rotator_info(&self) -> Result<Envelope<Value>>;
    async fn guider_info(&self) -> Result<Envelope<Value>>;
    async fn guider_graph(&self) -> Result<Envelope<Value>>;
    async fn flatdevice_info(&self) -> Result<Envelope<Value>>;
    async fn dome_info(&self) -> Result<Envelope<Value>>;
    async fn safety_info(&self) -> Result<Envelope<Value>>;
    async fn weather_info(&self) -> Result<Envelope<Value>>;
    async fn switch_info(&self) -> Result<Envelope<Value>>;

    async fn profile_active(&self) -> Result<Envelope<Value>>;

    async fn sequence_image(
        &self,
        index: u32,
        quality: u8,
        resize: bool,
        scale: f64,
    ) -> Result<Envelope<String>>;
}

/// reqwest-backed transport against the controller's v2 HTTP API.
///
/// No retries or authentication here; timeout policy belongs to the reqwest
/// client handed in via `with_client`.
pub struct HttpSequencerApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSequencerApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    async fn get_envelope<T: DeserializeOwned + Default>(&self, path: &str) -> Result<Envelope<T>> {
        let url = format!("{}/v2/api/{}", self.base_url, path);
        let envelope = self.client.get(&url).send().await?.json().await?;
        Ok(envelope)
    }
}

#[async_trait]
impl SequencerApi for HttpSequencerApi {
    async fn version(&self) -> Result<Envelope<String>> {
        self.get_envelope("version").await
    }

    async fn sequence_state(&self) -> Result<Envelope<Value>> {
        self.get_envelope("sequence/state").await
    }

    async fn sequence_json(&self) -> Result<Envelope<Value>> {
        self.get_envelope("sequence/json").await
    }

    async fn image_history(&self) -> Result<Envelope<Value>> {
        self.get_envelope("image-history?all=true").await
    }

    async fn camera_info(&self) -> Result<Envelope<Value>> {
        self.get_envelope("equipment/camera/info").await
    }

    async fn mount_info(&self) -> Result<Envelope<Value>> {
        self.get_envelope("equipment/mount/info").await
    }

    async fn filter_info(&self) -> Result<Envelope<Value>> {
        self.get_envelope("equipment/filterwheel/info").await
    }

    async fn focuser_info(&self) -> Result<Envelope<Value>> {
        self.get_envelope("equipment/focuser/info").await
    }

    async fn focuser_autofocus_info(&self) -> Result<Envelope<Value>> {
        self.get_envelope("equipment/focuser/last-af").await
    }

    async fn rotator_info(&self) -> Result<Envelope<Value>> {
        self.get_envelope("equipment/rotator/info").await
    }

    async fn guider_info(&self) -> Result<Envelope<Value>> {
        self.get_envelope("equipment/guider/info").await
    }

    async fn guider_graph(&self) -> Result<Envelope<Value>> {
        self.get_envelope("equipment/guider/graph").await
    }

    async fn flatdevice_info(&self) -> Result<Envelope<Value>> {
        self.get_envelope("equipment/flatdevice/info").await
    }

    async fn dome_info(&self) -> Result<Envelope<Value>> {
        self.get_envelope("equipment/dome/info").await
    }

    async fn safety_info(&self) -> Result<Envelope<Value>> {
        self.get_envelope("equipment/safetymonitor/info").await
    }

    async fn weather_info(&self) -> Result<Envelope<Value>> {
        self.get_envelope("equipment/weather/info").await
    }

    async fn switch_info(&self) -> Result<Envelope<Value>> {
        self.get_envelope("equipment/switch/info").await
    }

    async fn profile_active(&self) -> Result<Envelope<Value>> {
        self.get_envelope("profile/show?active=true").await
    }

    async fn sequence_image(
        &self,
        index: u32,
        quality: u8,
        resize: bool,
        scale: f64,
    ) -> Result<Envelope<String>> {
        let path =
            format!("sequence/image/{index}?quality={quality}&resize={resize}&scale={scale}");
        self.get_envelope(&path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let api = HttpSequencerApi::new("http://localhost:1888/");
        assert_eq!(api.base_url, "http://localhost:1888");
    }
}
