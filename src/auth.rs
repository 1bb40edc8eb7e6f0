//! Who is making the request. Handlers take a `Requester` (or `Option<Requester>`) argument; it is
//! read from an `Authorization: Bearer <JWT>` header signed with the configured secret.
use crate::cascade::Requester;
use crate::twoface::{Cause, DescribeErr, ExternalError, Fallible, TfError};
use actix_web::{dev::Payload, http::header::Header, web, FromRequest, HttpRequest};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use futures::future::{ready, Ready};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const BAD_TOKEN: ExternalError = ExternalError {
    cause: Cause::UserBadAuth,
    text: "Missing or invalid bearer token",
};

/// The HMAC secret bearer tokens are signed with. Registered as app data.
#[derive(Clone)]
pub struct TokenSecret(pub String);

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The requesting user's ID.
    pub sub: Uuid,
    /// Expiry, seconds since the epoch.
    pub exp: usize,
}

fn requester_from(req: &HttpRequest) -> Fallible<Requester> {
    guard!(let Some(secret) = req.app_data::<web::Data<TokenSecret>>() else {
        return Err(TfError::new(Cause::ServerError, "Auth is misconfigured"));
    });
    let header = Authorization::<Bearer>::parse(req)
        .map_err(|e| TfError {
            internal: anyhow::anyhow!("bad Authorization header: {}", e),
            external: BAD_TOKEN,
        })?;
    let bearer = header.into_scheme();
    let token: &str = bearer.token();
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.0.as_bytes()),
        &Validation::default(),
    )
    .describe_err(BAD_TOKEN)?
    .claims;
    Ok(Requester {
        user_id: claims.sub,
    })
}

impl FromRequest for Requester {
    type Error = TfError;
    type Future = Ready<Result<Self, Self::Error>>;
    type Config = ();

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(requester_from(req))
    }
}

/// Sign a token for the given user, valid for an hour.
#[cfg(test)]
pub fn token_for(secret: &str, user_id: Uuid) -> String {
    use jsonwebtoken::{encode, EncodingKey};
    let claims = Claims {
        sub: user_id,
        exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize,
    };
    encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}
