//! Garage server wire format.
//!
//! Both exchanges are `POST` requests with a small JSON body.  The same
//! fields are mirrored into the query string for older server versions
//! that only read the URL.
//!
//! | Exchange | Query                                   | Body                          |
//! |----------|-----------------------------------------|-------------------------------|
//! | sensors  | `buildTimestamp`, `sensorA`, `sensorB`  | `device_id, sensor_a, sensor_b` |
//! | token    | `buildTimestamp`, `buttonAckToken`      | `device_id, button_token`     |
//!
//! The token response is `{"buttonAckToken": "<token>"}`; unknown fields
//! are ignored.

use core::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::app::button_token::{ButtonToken, TokenError, MAX_TOKEN_LEN};
use crate::config::{MAX_BASE_URL_LEN, MAX_DEVICE_ID_LEN, MAX_ENDPOINT_LEN};
use crate::error::CommsError;
use crate::sensors::DoorSensors;

const ID_KEY: &str = "?buildTimestamp=";
const TOKEN_KEY: &str = "&buttonAckToken=";

/// Worst-case percent-encoded length of `n` bytes.
const fn encoded_len(n: usize) -> usize {
    3 * n
}

/// Capacity of a fully-built request URL.
///
/// Sized for the longest token request: every byte of the device id and
/// of an accepted token may need a `%XX` escape.
pub const MAX_URL_LEN: usize = MAX_BASE_URL_LEN
    + MAX_ENDPOINT_LEN
    + ID_KEY.len()
    + encoded_len(MAX_DEVICE_ID_LEN)
    + TOKEN_KEY.len()
    + encoded_len(MAX_TOKEN_LEN);

/// Receive buffer for response bodies.
pub const RECEIVE_BUFFER_LEN: usize = 1024;

pub type Url = heapless::String<MAX_URL_LEN>;

#[derive(Debug, Serialize)]
pub struct SensorRequest<'a> {
    pub device_id: &'a str,
    pub sensor_a: u8,
    pub sensor_b: u8,
}

impl<'a> SensorRequest<'a> {
    pub fn new(device_id: &'a str, sensors: &DoorSensors) -> Self {
        Self {
            device_id,
            sensor_a: sensors.a.as_u8(),
            sensor_b: sensors.b.as_u8(),
        }
    }

    pub fn url(&self, base: &str, endpoint: &str) -> Result<Url, CommsError> {
        let mut url = Url::new();
        write!(url, "{base}{endpoint}{ID_KEY}").map_err(|_| CommsError::RequestEncoding)?;
        push_encoded(&mut url, self.device_id)?;
        write!(url, "&sensorA={}&sensorB={}", self.sensor_a, self.sensor_b)
            .map_err(|_| CommsError::RequestEncoding)?;
        Ok(url)
    }

    pub fn body(&self) -> Result<Vec<u8>, CommsError> {
        serde_json::to_vec(self).map_err(|_| CommsError::RequestEncoding)
    }
}

#[derive(Debug, Serialize)]
pub struct ButtonRequest<'a> {
    pub device_id: &'a str,
    /// Last consumed token; empty before the first exchange.
    pub button_token: &'a str,
}

impl<'a> ButtonRequest<'a> {
    pub fn new(device_id: &'a str, last: Option<&'a ButtonToken>) -> Self {
        Self {
            device_id,
            button_token: last.map_or("", ButtonToken::as_str),
        }
    }

    pub fn url(&self, base: &str, endpoint: &str) -> Result<Url, CommsError> {
        let mut url = Url::new();
        write!(url, "{base}{endpoint}{ID_KEY}").map_err(|_| CommsError::RequestEncoding)?;
        push_encoded(&mut url, self.device_id)?;
        url.push_str(TOKEN_KEY)
            .map_err(|_| CommsError::RequestEncoding)?;
        push_encoded(&mut url, self.button_token)?;
        Ok(url)
    }

    pub fn body(&self) -> Result<Vec<u8>, CommsError> {
        serde_json::to_vec(self).map_err(|_| CommsError::RequestEncoding)
    }
}

#[derive(Debug, Deserialize)]
struct ButtonResponse {
    #[serde(rename = "buttonAckToken")]
    button_ack_token: String,
}

/// Parse a token-exchange response body.
///
/// An empty token is the server's "nothing to do" answer before it has
/// minted one; it is reported as [`CommsError::EmptyToken`] so the caller
/// skips the cycle instead of consuming it.
pub fn parse_button_response(body: &[u8]) -> Result<ButtonToken, CommsError> {
    let resp: ButtonResponse =
        serde_json::from_slice(body).map_err(|_| CommsError::MalformedResponse)?;
    ButtonToken::new(&resp.button_ack_token).map_err(|e| match e {
        TokenError::Empty => CommsError::EmptyToken,
        TokenError::TooLong => CommsError::TokenTooLong,
    })
}

/// Append `value` percent-encoded (RFC 3986 unreserved set passes through).
fn push_encoded<const N: usize>(
    out: &mut heapless::String<N>,
    value: &str,
) -> Result<(), CommsError> {
    for b in value.bytes() {
        let ok = if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') {
            out.push(b as char).is_ok()
        } else {
            write!(out, "%{b:02X}").is_ok()
        };
        if !ok {
            return Err(CommsError::RequestEncoding);
        }
    }
    Ok(())
}
