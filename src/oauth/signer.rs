//! OAuth 1.0a HMAC-SHA1 request signing.
//!
//! [`Signer`] owns the consumer credentials and turns `{method, url, params}` plus a
//! [`TokenPair`] into a [`SignedRequest`] carrying the `Authorization` header. Caller
//! parameters prefixed with `oauth_` travel in the header; everything else stays in the
//! form body. Query parameters on the URL are signed but left in place.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::{Rng, distr::Alphanumeric};
use sha1::Sha1;
// self
use crate::{
	_prelude::*,
	auth::{ConsumerCredentials, TokenPair},
	error::ConfigError,
};

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters are the only ones left unescaped.
const RFC3986: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');
const NONCE_LEN: usize = 32;
const OAUTH_PREFIX: &str = "oauth_";
const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const VERSION: &str = "1.0";

/// Percent-encodes `value` with the RFC 3986 unreserved set.
pub fn percent_encode(value: &str) -> String {
	utf8_percent_encode(value, RFC3986).to_string()
}

/// Draws a fresh 32-character alphanumeric nonce.
pub fn nonce() -> String {
	rand::rng().sample_iter(Alphanumeric).take(NONCE_LEN).map(char::from).collect()
}

/// Signed outbound request ready for a transport.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedRequest {
	/// Upper-cased HTTP method.
	pub method: String,
	/// Target URL including any query parameters.
	pub url: Url,
	/// Non-`oauth_*` parameters sent as a URL-encoded body.
	pub form: Vec<(String, String)>,
	/// Complete `Authorization` header value.
	pub authorization: String,
	/// Signature base string the signature was computed over.
	pub base_string: String,
	/// Base64 HMAC-SHA1 signature.
	pub signature: String,
}
impl SignedRequest {
	/// Encodes [`Self::form`] as an `application/x-www-form-urlencoded` body.
	pub fn form_body(&self) -> String {
		self.form
			.iter()
			.map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
			.collect::<Vec<_>>()
			.join("&")
	}
}
impl Debug for SignedRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SignedRequest")
			.field("method", &self.method)
			.field("url", &self.url.as_str())
			.field("form_keys", &self.form.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>())
			.field("authorization", &"<redacted>")
			.finish()
	}
}

/// HMAC-SHA1 signer bound to one consumer.
#[derive(Clone, Debug)]
pub struct Signer {
	consumer: ConsumerCredentials,
}
impl Signer {
	/// Creates a signer, rejecting blank consumer credentials.
	pub fn new(consumer: ConsumerCredentials) -> Result<Self, ConfigError> {
		if !consumer.is_complete() {
			return Err(ConfigError::MissingConsumerCredentials);
		}

		Ok(Self { consumer })
	}

	/// Consumer key sent as `oauth_consumer_key`.
	pub fn consumer_key(&self) -> &str {
		&self.consumer.key
	}

	/// Signs a request with a fresh nonce and the current timestamp.
	pub fn sign(
		&self,
		method: &str,
		url: &Url,
		params: &[(String, String)],
		token: &TokenPair,
	) -> Result<SignedRequest, ConfigError> {
		self.sign_with(
			method,
			url,
			params,
			token,
			&nonce(),
			OffsetDateTime::now_utc().unix_timestamp(),
		)
	}

	/// Signs a request with a caller-chosen nonce and timestamp.
	pub fn sign_with(
		&self,
		method: &str,
		url: &Url,
		params: &[(String, String)],
		token: &TokenPair,
		nonce: &str,
		timestamp: i64,
	) -> Result<SignedRequest, ConfigError> {
		let method = method.to_ascii_uppercase();
		let mut oauth = BTreeMap::from([
			("oauth_consumer_key".to_owned(), self.consumer.key.clone()),
			("oauth_nonce".to_owned(), nonce.to_owned()),
			("oauth_signature_method".to_owned(), SIGNATURE_METHOD.to_owned()),
			("oauth_timestamp".to_owned(), timestamp.to_string()),
			("oauth_version".to_owned(), VERSION.to_owned()),
		]);

		if !token.key.is_empty() {
			oauth.insert("oauth_token".into(), token.key.clone());
		}

		let mut form = Vec::new();

		for (k, v) in params {
			if k.starts_with(OAUTH_PREFIX) {
				oauth.insert(k.clone(), v.clone());
			} else {
				form.push((k.clone(), v.clone()));
			}
		}

		let query = url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned()));
		let signed = oauth.iter().map(|(k, v)| (k.clone(), v.clone())).chain(query);
		let base_string = base_string(&method, url, signed.chain(form.iter().cloned()));
		let key = format!(
			"{}&{}",
			percent_encode(self.consumer.secret.expose()),
			percent_encode(token.secret.expose())
		);
		let mut mac = HmacSha1::new_from_slice(key.as_bytes())
			.map_err(|e| ConfigError::InvalidRequest { reason: e.to_string() })?;

		mac.update(base_string.as_bytes());

		let signature = BASE64.encode(mac.finalize().into_bytes());

		oauth.insert("oauth_signature".into(), signature.clone());

		let authorization = format!(
			"OAuth {}",
			oauth
				.iter()
				.map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
				.collect::<Vec<_>>()
				.join(", ")
		);

		Ok(SignedRequest { method, url: url.clone(), form, authorization, base_string, signature })
	}
}

/// Builds `METHOD&pct(base_uri)&pct(normalized params)`.
fn base_string<I>(method: &str, url: &Url, params: I) -> String
where
	I: IntoIterator<Item = (String, String)>,
{
	let mut base_uri = url.clone();

	base_uri.set_query(None);
	base_uri.set_fragment(None);

	let mut encoded = params
		.into_iter()
		.map(|(k, v)| (percent_encode(&k), percent_encode(&v)))
		.collect::<Vec<_>>();

	encoded.sort();

	let normalized = encoded.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join("&");

	format!("{method}&{}&{}", percent_encode(base_uri.as_str()), percent_encode(&normalized))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
		raw.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
	}

	#[test]
	fn percent_encoding_follows_rfc3986() {
		assert_eq!(percent_encode("hello world"), "hello%20world");
		assert_eq!(percent_encode("foo=bar&baz"), "foo%3Dbar%26baz");
		assert_eq!(percent_encode("test-value_123.txt~"), "test-value_123.txt~");
		assert_eq!(percent_encode("Ladies + Gentlemen!"), "Ladies%20%2B%20Gentlemen%21");
		assert_eq!(percent_encode("*'()"), "%2A%27%28%29");
		assert_eq!(percent_encode("☃"), "%E2%98%83");
	}

	#[test]
	fn nonce_is_fresh_and_alphanumeric() {
		let a = nonce();
		let b = nonce();

		assert_eq!(a.len(), NONCE_LEN);
		assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
		assert_ne!(a, b);
	}

	#[test]
	fn blank_consumer_is_rejected() {
		let err = Signer::new(ConsumerCredentials::new("key", ""))
			.expect_err("Blank consumer secret must be rejected.");

		assert!(matches!(err, ConfigError::MissingConsumerCredentials));
	}

	#[test]
	fn twitter_update_vector_reproduces() {
		let signer = Signer::new(ConsumerCredentials::new(
			"xvz1evFS4wEEPTGEFPHBog",
			"kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
		))
		.expect("Vector consumer should be valid.");
		let url =
			Url::parse("https://api.twitter.com/1.1/statuses/update.json?include_entities=true")
				.expect("Vector URL should parse.");
		let token = TokenPair::new(
			"370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
			"LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE",
		);
		let signed = signer
			.sign_with(
				"post",
				&url,
				&pairs(&[("status", "Hello Ladies + Gentlemen, a signed OAuth request!")]),
				&token,
				"kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg",
				1_318_622_958,
			)
			.expect("Vector request should sign.");

		assert_eq!(
			signed.base_string,
			"POST&https%3A%2F%2Fapi.twitter.com%2F1.1%2Fstatuses%2Fupdate.json&include_entities%3Dtrue%26oauth_consumer_key%3Dxvz1evFS4wEEPTGEFPHBog%26oauth_nonce%3DkYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg%26oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1318622958%26oauth_token%3D370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb%26oauth_version%3D1.0%26status%3DHello%2520Ladies%2520%252B%2520Gentlemen%252C%2520a%2520signed%2520OAuth%2520request%2521"
		);
		assert_eq!(signed.signature, "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");
		assert_eq!(signed.method, "POST");
		assert!(
			signed.authorization.starts_with("OAuth oauth_consumer_key=\"xvz1evFS4wEEPTGEFPHBog\", ")
		);
		assert!(
			signed.authorization.contains("oauth_signature=\"hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D\"")
		);
		assert_eq!(
			signed.form_body(),
			"status=Hello%20Ladies%20%2B%20Gentlemen%2C%20a%20signed%20OAuth%20request%21"
		);
		assert_eq!(signed.url.query(), Some("include_entities=true"));
	}

	#[test]
	fn photos_vector_reproduces() {
		let signer = Signer::new(ConsumerCredentials::new("dpf43f3p2l4k3l03", "kd94hf93k423kf44"))
			.expect("Vector consumer should be valid.");
		let url = Url::parse("http://photos.example.net/photos?file=vacation.jpg&size=original")
			.expect("Vector URL should parse.");
		let signed = signer
			.sign_with(
				"GET",
				&url,
				&[],
				&TokenPair::new("nnch734d00sl2jdk", "pfkkdhi9sl3r4s00"),
				"kllo9940pd9333jh",
				1_191_242_096,
			)
			.expect("Vector request should sign.");

		assert_eq!(
			signed.base_string,
			"GET&http%3A%2F%2Fphotos.example.net%2Fphotos&file%3Dvacation.jpg%26oauth_consumer_key%3Ddpf43f3p2l4k3l03%26oauth_nonce%3Dkllo9940pd9333jh%26oauth_signature_method%3DHMAC-SHA1%26oauth_timestamp%3D1191242096%26oauth_token%3Dnnch734d00sl2jdk%26oauth_version%3D1.0%26size%3Doriginal"
		);
		assert_eq!(signed.signature, "tR3+Ty81lMeYAr/Fid0kMTYa/WM=");
		assert!(signed.form.is_empty());
	}

	#[test]
	fn oauth_params_move_to_header_and_empty_token_is_omitted() {
		let signer =
			Signer::new(ConsumerCredentials::new("ck", "cs")).expect("Consumer should be valid.");
		let url = Url::parse("https://api.x.com/oauth/request_token").expect("URL should parse.");
		let signed = signer
			.sign_with(
				"POST",
				&url,
				&pairs(&[("oauth_callback", "https://broker.example/auth/callback")]),
				&TokenPair::empty(),
				"nonce",
				1,
			)
			.expect("Request should sign.");

		assert!(signed.form.is_empty());
		assert!(!signed.authorization.contains("oauth_token="));
		assert!(signed
			.authorization
			.contains("oauth_callback=\"https%3A%2F%2Fbroker.example%2Fauth%2Fcallback\""));
		assert!(signed.base_string.contains("oauth_callback%3Dhttps%253A%252F%252Fbroker.example"));
	}

	#[test]
	fn caller_oauth_token_deduplicates_with_token_pair() {
		let signer =
			Signer::new(ConsumerCredentials::new("ck", "cs")).expect("Consumer should be valid.");
		let url = Url::parse("https://api.x.com/oauth/access_token").expect("URL should parse.");
		let signed = signer
			.sign_with(
				"POST",
				&url,
				&pairs(&[("oauth_token", "abc"), ("oauth_verifier", "v1")]),
				&TokenPair::unsecured("abc"),
				"nonce",
				1,
			)
			.expect("Request should sign.");

		assert_eq!(signed.authorization.matches("oauth_token=").count(), 1);
		assert_eq!(signed.base_string.matches("oauth_token%3D").count(), 1);
		assert!(signed.authorization.contains("oauth_verifier=\"v1\""));
	}

	#[test]
	fn signatures_differ_per_call() {
		let signer =
			Signer::new(ConsumerCredentials::new("ck", "cs")).expect("Consumer should be valid.");
		let url = Url::parse("https://api.x.com/oauth/request_token").expect("URL should parse.");
		let a =
			signer.sign("POST", &url, &[], &TokenPair::empty()).expect("First sign should work.");
		let b =
			signer.sign("POST", &url, &[], &TokenPair::empty()).expect("Second sign should work.");

		assert_ne!(a.signature, b.signature);
	}
}
