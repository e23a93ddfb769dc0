//! Signed session cookie: `smile_session=<uuid>.<hex hmac-sha256>`.

use axum::http::{HeaderMap, header};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "smile_session";

type HmacSha256 = Hmac<Sha256>;

pub struct CookieSigner {
    mac: HmacSha256,
    max_age_secs: u64,
}

impl CookieSigner {
    pub fn new(secret: &str, max_age_secs: u64) -> anyhow::Result<Self> {
        let mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
            .map_err(|e| anyhow::anyhow!("invalid session secret: {e}"))?;
        Ok(Self { mac, max_age_secs })
    }

    fn tag(&self, id: &str) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(id.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    pub fn sign(&self, id: Uuid) -> String {
        let id = id.to_string();
        let tag = hex::encode(self.tag(&id));
        format!("{id}.{tag}")
    }

    /// Session id from a cookie value, or `None` when the signature does not
    /// match.
    pub fn verify(&self, value: &str) -> Option<Uuid> {
        let (id, tag) = value.split_once('.')?;
        let provided = hex::decode(tag).ok()?;
        let expected = self.tag(id);
        if !bool::from(expected.as_slice().ct_eq(&provided)) {
            return None;
        }
        Uuid::parse_str(id).ok()
    }

    /// Verified session id from the request's `Cookie` headers.
    pub fn session_from(&self, headers: &HeaderMap) -> Option<Uuid> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|raw| raw.split(';'))
            .filter_map(|pair| pair.trim().strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
            .find_map(|value| self.verify(value))
    }

    /// `Set-Cookie` value for a session.
    pub fn set_cookie(&self, id: Uuid) -> String {
        format!(
            "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.sign(id),
            self.max_age_secs
        )
    }
}

impl std::fmt::Debug for CookieSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieSigner")
            .field("max_age_secs", &self.max_age_secs)
            .finish_non_exhaustive()
    }
}
