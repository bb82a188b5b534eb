use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde_json::Value;

use super::cache::LastRequestCache;
use crate::error::AppError;

pub const DEFAULT_ENDPOINT: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";

const AUDIO_ENCODING: &str = "MP3";
const AUDIO_MIME: &str = "audio/mp3";

/// Everything needed for one synthesis call. Rate and pitch are expected to
/// be clamped already.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub credential: String,
    pub text: String,
    pub language_code: String,
    pub voice_name: String,
    pub pitch: f64,
    pub speaking_rate: f64,
}

#[derive(Serialize)]
struct SynthesizeBody<'a> {
    input: InputBody<'a>,
    voice: VoiceBody<'a>,
    #[serde(rename = "audioConfig")]
    audio_config: AudioConfigBody,
}

#[derive(Serialize)]
struct InputBody<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceBody<'a> {
    name: &'a str,
    language_code: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfigBody {
    audio_encoding: &'static str,
    speaking_rate: f64,
    pitch: f64,
}

impl SynthesisRequest {
    /// Serialized JSON body. The credential travels in the query string and
    /// is not part of it.
    pub fn payload(&self) -> Result<String, AppError> {
        let body = SynthesizeBody {
            input: InputBody { text: &self.text },
            voice: VoiceBody {
                name: &self.voice_name,
                language_code: &self.language_code,
            },
            audio_config: AudioConfigBody {
                audio_encoding: AUDIO_ENCODING,
                speaking_rate: self.speaking_rate,
                pitch: self.pitch,
            },
        };

        Ok(serde_json::to_string(&body)?)
    }
}

/// Client for the remote text:synthesize endpoint.
///
/// Owns a [`LastRequestCache`]: a request whose serialized body equals the
/// last successful one is answered from memory. Calls are not serialized
/// here; callers that may overlap requests must do that themselves.
pub struct SynthesisClient {
    http: reqwest::Client,
    endpoint: String,
    cache: LastRequestCache,
}

impl SynthesisClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_cache(endpoint, LastRequestCache::new())
    }

    pub fn with_cache(endpoint: impl Into<String>, cache: LastRequestCache) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            cache,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn cache(&self) -> &LastRequestCache {
        &self.cache
    }

    /// Synthesize `request` and return the decoded MP3 bytes.
    pub async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, AppError> {
        let body = request.payload()?;

        if let Some(audio) = self.cache.get(&body) {
            tracing::debug!(voice = %request.voice_name, "Reusing cached synthesis");
            return Ok(audio);
        }

        tracing::debug!(
            voice = %request.voice_name,
            chars = request.text.chars().count(),
            "Calling synthesis API"
        );

        // without_url keeps the key query parameter out of error messages
        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", request.credential.as_str())])
            .header(CONTENT_TYPE, "application/json")
            .body(body.clone())
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(reqwest::Error::without_url)?;

        if !status.is_success() {
            tracing::warn!("Synthesis API returned {}", status);
            return Err(AppError::Remote {
                status: status.as_u16(),
                body: text,
            });
        }

        let audio = decode_audio_content(&text).map_err(|e| {
            tracing::warn!("{}", e);
            e
        })?;

        self.cache.store(body, audio.clone());

        Ok(audio)
    }
}

fn decode_audio_content(body: &str) -> Result<Vec<u8>, AppError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| AppError::MalformedResponse(format!("body is not JSON: {}", e)))?;

    let content = value
        .as_object()
        .and_then(|obj| obj.get("audioContent"))
        .and_then(Value::as_str)
        .ok_or_else(|| {
            AppError::MalformedResponse("expected an object with string audioContent".into())
        })?;

    STANDARD
        .decode(content)
        .map_err(|e| AppError::MalformedResponse(format!("audioContent is not base64: {}", e)))
}

/// Wrap audio bytes in a `data:` URI an audio element can play directly.
pub fn audio_data_uri(audio: &[u8]) -> String {
    format!("data:{};base64,{}", AUDIO_MIME, STANDARD.encode(audio))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    const PATH: &str = "/v1/text:synthesize";

    fn request(text: &str) -> SynthesisRequest {
        SynthesisRequest {
            credential: "secret".to_string(),
            text: text.to_string(),
            language_code: "ja-JP".to_string(),
            voice_name: "ja-JP-Neural2-B".to_string(),
            pitch: 0.0,
            speaking_rate: 1.0,
        }
    }

    fn client_for(server: &Server) -> SynthesisClient {
        SynthesisClient::new(format!("{}{}", server.url(), PATH))
    }

    #[test]
    fn payload_matches_api_shape() {
        let payload = request("こんにちは").payload().unwrap();
        let value: Value = serde_json::from_str(&payload).unwrap();

        assert_eq!(
            value,
            json!({
                "input": { "text": "こんにちは" },
                "voice": { "name": "ja-JP-Neural2-B", "languageCode": "ja-JP" },
                "audioConfig": { "audioEncoding": "MP3", "speakingRate": 1.0, "pitch": 0.0 }
            })
        );
        assert!(!payload.contains("secret"));
    }

    #[test]
    fn wraps_audio_in_data_uri() {
        assert_eq!(audio_data_uri(b"ABC"), "data:audio/mp3;base64,QUJD");
    }

    #[tokio::test]
    async fn decodes_audio_content_and_caches_it() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_query(Matcher::UrlEncoded("key".into(), "secret".into()))
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(json!({
                "voice": { "name": "ja-JP-Neural2-B", "languageCode": "ja-JP" },
                "audioConfig": { "audioEncoding": "MP3" }
            })))
            .with_status(200)
            .with_body(r#"{"audioContent":"QUJD"}"#)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let req = request("hello");
        let audio = client.synthesize(&req).await.unwrap();

        assert_eq!(audio, vec![0x41, 0x42, 0x43]);
        assert_eq!(client.cache().body(), Some(req.payload().unwrap()));
        assert_eq!(client.cache().get(&req.payload().unwrap()), Some(b"ABC".to_vec()));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn identical_request_is_sent_once() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"audioContent":"QUJD"}"#)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let first = client.synthesize(&request("hello")).await.unwrap();
        let second = client.synthesize(&request("hello")).await.unwrap();

        assert_eq!(first, second);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn changed_field_issues_new_call() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"audioContent":"QUJD"}"#)
            .expect(2)
            .create_async()
            .await;

        let client = client_for(&server);
        let original = request("hello");
        let pitched = SynthesisRequest {
            pitch: 2.0,
            ..original.clone()
        };

        client.synthesize(&original).await.unwrap();
        client.synthesize(&pitched).await.unwrap();

        assert_eq!(client.cache().body(), Some(pitched.payload().unwrap()));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn credential_change_alone_reuses_cache() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"audioContent":"QUJD"}"#)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let original = request("hello");
        let other_key = SynthesisRequest {
            credential: "another".to_string(),
            ..original.clone()
        };

        client.synthesize(&original).await.unwrap();
        client.synthesize(&other_key).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn remote_error_leaves_cache_untouched() {
        let mut server = Server::new_async().await;
        let ok = server
            .mock("POST", PATH)
            .match_query(Matcher::Any)
            .match_body(Matcher::PartialJson(json!({ "input": { "text": "first" } })))
            .with_status(200)
            .with_body(r#"{"audioContent":"QUJD"}"#)
            .expect(1)
            .create_async()
            .await;
        let failing = server
            .mock("POST", PATH)
            .match_query(Matcher::Any)
            .match_body(Matcher::PartialJson(json!({ "input": { "text": "second" } })))
            .with_status(500)
            .with_body("quota exceeded")
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let first = request("first");
        client.synthesize(&first).await.unwrap();

        let err = client.synthesize(&request("second")).await.unwrap_err();
        match err {
            AppError::Remote { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "quota exceeded");
            }
            other => panic!("expected remote error, got {:?}", other),
        }

        assert_eq!(client.cache().body(), Some(first.payload().unwrap()));
        // still served from the cache
        assert_eq!(client.synthesize(&first).await.unwrap(), b"ABC".to_vec());

        ok.assert_async().await;
        failing.assert_async().await;
    }

    #[tokio::test]
    async fn missing_audio_content_is_malformed() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", PATH)
            .match_query(Matcher::Any)
            .match_body(Matcher::PartialJson(json!({ "input": { "text": "first" } })))
            .with_status(200)
            .with_body(r#"{"audioContent":"QUJD"}"#)
            .create_async()
            .await;
        server
            .mock("POST", PATH)
            .match_query(Matcher::Any)
            .match_body(Matcher::PartialJson(json!({ "input": { "text": "second" } })))
            .with_status(200)
            .with_body(r#"{"foo":"bar"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let first = request("first");
        client.synthesize(&first).await.unwrap();

        let err = client.synthesize(&request("second")).await.unwrap_err();

        assert!(matches!(err, AppError::MalformedResponse(_)));
        assert_eq!(client.cache().body(), Some(first.payload().unwrap()));
        assert_eq!(client.cache().get(&first.payload().unwrap()), Some(b"ABC".to_vec()));
    }

    #[tokio::test]
    async fn injected_cache_answers_without_network() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let req = request("hello");
        let cache = LastRequestCache::new();
        cache.store(req.payload().unwrap(), b"XYZ".to_vec());

        let client = SynthesisClient::with_cache(format!("{}{}", server.url(), PATH), cache);
        assert_eq!(client.synthesize(&req).await.unwrap(), b"XYZ".to_vec());

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn rejects_other_unexpected_bodies() {
        let mut server = Server::new_async().await;
        for (text, body) in [
            ("array", r#"["QUJD"]"#),
            ("number", r#"{"audioContent":42}"#),
            ("html", "<html>oops</html>"),
            ("base64", r#"{"audioContent":"not base64!"}"#),
        ] {
            server
                .mock("POST", PATH)
                .match_query(Matcher::Any)
                .match_body(Matcher::PartialJson(json!({ "input": { "text": text } })))
                .with_status(200)
                .with_body(body)
                .create_async()
                .await;
        }

        let client = client_for(&server);
        for text in ["array", "number", "html", "base64"] {
            let err = client.synthesize(&request(text)).await.unwrap_err();
            assert!(
                matches!(err, AppError::MalformedResponse(_)),
                "{}: {:?}",
                text,
                err
            );
        }
        assert!(client.cache().is_empty());
    }
}
