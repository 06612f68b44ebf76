use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

use super::{Command, CommandSink};
use crate::bridge::{
    ClosePosition, ExpandProperties, ForceOrientation, OrientationProperties, ResizeProperties,
};

pub const DEFAULT_SCHEME: &str = "mraid";

/// Characters left alone by `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Error)]
pub enum UrlSchemeError {
    #[error("invalid command scheme: {0:?}")]
    InvalidScheme(String),
    #[error("failed to parse command URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("expected scheme {expected:?}, found {found:?}")]
    UnexpectedScheme { expected: String, found: String },
    #[error("command URL has no command name")]
    MissingCommand,
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("invalid command parameters: {0}")]
    Params(#[from] serde_urlencoded::de::Error),
    #[error("invalid calendar payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Wire form of [`Command`]: `scheme://command/?key=value&...`, with every
/// value percent-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlSchemeCodec {
    scheme: String,
}

impl Default for UrlSchemeCodec {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
        }
    }
}

impl UrlSchemeCodec {
    pub fn new(scheme: impl Into<String>) -> Result<Self, UrlSchemeError> {
        let scheme = scheme.into();
        let probe = Url::parse(&format!("{scheme}://close/"))
            .map_err(|_| UrlSchemeError::InvalidScheme(scheme.clone()))?;
        if probe.scheme() != scheme {
            return Err(UrlSchemeError::InvalidScheme(scheme));
        }
        Ok(Self { scheme })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn encode(&self, command: &Command) -> Result<String, UrlSchemeError> {
        let params: Vec<(&str, String)> = match command {
            Command::Close => Vec::new(),
            Command::Expand { properties, url } => {
                let mut params = vec![
                    ("w", properties.width.to_string()),
                    ("h", properties.height.to_string()),
                    ("useCustomClose", properties.use_custom_close.to_string()),
                ];
                if let Some(url) = url {
                    params.push(("url", url.clone()));
                }
                params
            }
            Command::Resize { properties } => vec![
                ("w", properties.width.to_string()),
                ("h", properties.height.to_string()),
                ("offset_x", properties.offset_x.to_string()),
                ("offset_y", properties.offset_y.to_string()),
                (
                    "custom_close_position",
                    properties.custom_close_position.to_string(),
                ),
                ("allow_offscreen", properties.allow_offscreen.to_string()),
            ],
            Command::SetOrientationProperties { properties } => vec![
                (
                    "allow_orientation_change",
                    properties.allow_orientation_change.to_string(),
                ),
                ("force_orientation", properties.force_orientation.to_string()),
            ],
            Command::Open { url } => vec![("url", url.clone())],
            Command::CreateCalendarEvent { payload } => {
                vec![("p", serde_json::to_string(payload)?)]
            }
            Command::PlayVideo { uri } | Command::StorePicture { uri } => {
                vec![("uri", uri.clone())]
            }
        };

        let mut encoded = format!("{}://{}/", self.scheme, command.name());
        for (index, (key, value)) in params.iter().enumerate() {
            encoded.push(if index == 0 { '?' } else { '&' });
            encoded.push_str(key);
            encoded.push('=');
            encoded.extend(utf8_percent_encode(value, URI_COMPONENT));
        }
        Ok(encoded)
    }

    pub fn decode(&self, raw: &str) -> Result<Command, UrlSchemeError> {
        let url = Url::parse(raw)?;
        if url.scheme() != self.scheme {
            return Err(UrlSchemeError::UnexpectedScheme {
                expected: self.scheme.clone(),
                found: url.scheme().to_string(),
            });
        }
        let name = url
            .host_str()
            .filter(|name| !name.is_empty())
            .ok_or(UrlSchemeError::MissingCommand)?;
        let query = url.query().unwrap_or("");

        let command = match name.to_ascii_lowercase().as_str() {
            "close" => Command::Close,
            "expand" => {
                let params: ExpandParams = serde_urlencoded::from_str(query)?;
                Command::Expand {
                    properties: ExpandProperties {
                        width: params.w,
                        height: params.h,
                        use_custom_close: params.use_custom_close,
                        is_modal: true,
                    },
                    url: params.url,
                }
            }
            "resize" => {
                let params: ResizeParams = serde_urlencoded::from_str(query)?;
                Command::Resize {
                    properties: ResizeProperties {
                        width: params.w,
                        height: params.h,
                        offset_x: params.offset_x,
                        offset_y: params.offset_y,
                        custom_close_position: params.custom_close_position,
                        allow_offscreen: params.allow_offscreen,
                    },
                }
            }
            "setorientationproperties" => {
                let params: OrientationParams = serde_urlencoded::from_str(query)?;
                Command::SetOrientationProperties {
                    properties: OrientationProperties {
                        allow_orientation_change: params.allow_orientation_change,
                        force_orientation: params.force_orientation,
                    },
                }
            }
            "open" => {
                let params: UrlParams = serde_urlencoded::from_str(query)?;
                Command::Open { url: params.url }
            }
            "createcalendarevent" => {
                let params: PayloadParams = serde_urlencoded::from_str(query)?;
                Command::CreateCalendarEvent {
                    payload: serde_json::from_str(&params.p)?,
                }
            }
            "playvideo" => {
                let params: UriParams = serde_urlencoded::from_str(query)?;
                Command::PlayVideo { uri: params.uri }
            }
            "storepicture" => {
                let params: UriParams = serde_urlencoded::from_str(query)?;
                Command::StorePicture { uri: params.uri }
            }
            _ => return Err(UrlSchemeError::UnknownCommand(name.to_string())),
        };
        Ok(command)
    }
}

#[derive(Deserialize)]
struct ExpandParams {
    w: i32,
    h: i32,
    #[serde(rename = "useCustomClose")]
    use_custom_close: bool,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Deserialize)]
struct ResizeParams {
    w: i32,
    h: i32,
    offset_x: i32,
    offset_y: i32,
    custom_close_position: ClosePosition,
    allow_offscreen: bool,
}

#[derive(Deserialize)]
struct OrientationParams {
    allow_orientation_change: bool,
    force_orientation: ForceOrientation,
}

#[derive(Deserialize)]
struct UrlParams {
    url: String,
}

#[derive(Deserialize)]
struct UriParams {
    uri: String,
}

#[derive(Deserialize)]
struct PayloadParams {
    p: String,
}

/// [`CommandSink`] that encodes each command as a URL and hands it to a
/// navigation primitive supplied by the embedder.
pub struct UrlSchemeSink {
    codec: UrlSchemeCodec,
    navigate: Box<dyn Fn(&str)>,
}

impl UrlSchemeSink {
    pub fn new<F>(codec: UrlSchemeCodec, navigate: F) -> Self
    where
        F: Fn(&str) + 'static,
    {
        Self {
            codec,
            navigate: Box::new(navigate),
        }
    }

    pub fn codec(&self) -> &UrlSchemeCodec {
        &self.codec
    }
}

impl CommandSink for UrlSchemeSink {
    fn send(&self, command: Command) {
        match self.codec.encode(&command) {
            Ok(url) => {
                debug!(target: "mraid::transport", %url, "dispatching command URL");
                (self.navigate)(&url);
            }
            Err(err) => {
                error!(
                    target: "mraid::transport",
                    command = command.name(),
                    error = %err,
                    "failed to encode command"
                );
            }
        }
    }
}
