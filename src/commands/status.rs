use crate::{
    DEFAULT_PORT, DEFAULT_PROTOCOL_VERSION, DEFAULT_TIMEOUT, LOG_ONLY,
    models::json_data::{ServerStatus, StatusResponse},
    utils::{
        codec::{
            CodecError, PacketDecoder, build_packet, decode_string, encode_string, encode_var_int,
        },
        transport::{Connector, TcpConnector},
    },
};

use std::{future::Future, io, time::Duration};

use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, instrument, trace, warn};

const HANDSHAKE_ID: u32 = 0x00;
const STATUS_REQUEST_ID: u32 = 0x00;
const STATUS_RESPONSE_ID: u32 = 0x00;

/// Next state requested by the handshake, `2` would be login
const NEXT_STATE_STATUS: u32 = 1;

/// Servers reject handshake addresses longer than this
pub const MAX_HOST_LEN: usize = 255;

const READ_CHUNK_SIZE: usize = 4096;

#[derive(Debug, Clone)]
pub struct ProbeOptions {
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
    /// Declared in the handshake, servers answer a status request regardless of the version sent
    pub protocol_version: i32,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            host: String::from("localhost"),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
            protocol_version: DEFAULT_PROTOCOL_VERSION,
        }
    }
}

impl ProbeOptions {
    pub fn new<T: Into<String>>(host: T, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_protocol_version(mut self, protocol_version: i32) -> Self {
        self.protocol_version = protocol_version;
        self
    }
}

#[derive(Debug)]
pub enum ProbeErr {
    InvalidHost(usize),
    Transport(io::Error),
    UnexpectedEof,
    Protocol(CodecError),
    Json(serde_json::Error),
    TimedOut(Duration),
    Cancelled,
}

impl ProbeErr {
    /// Servers that answered with garbage are worth a closer look in the log, unreachable ones are not
    fn is_protocol_violation(&self) -> bool {
        matches!(self, Self::Protocol(_) | Self::Json(_))
    }
}

impl From<io::Error> for ProbeErr {
    fn from(err: io::Error) -> Self {
        Self::Transport(err)
    }
}

impl From<CodecError> for ProbeErr {
    fn from(err: CodecError) -> Self {
        Self::Protocol(err)
    }
}

impl From<serde_json::Error> for ProbeErr {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl std::fmt::Display for ProbeErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeErr::InvalidHost(len) => {
                write!(f, "Host name of {len} bytes exceeds the {MAX_HOST_LEN} byte limit")
            }
            ProbeErr::Transport(err) => write!(f, "{err}"),
            ProbeErr::UnexpectedEof => write!(f, "Connection closed before a status response was received"),
            ProbeErr::Protocol(err) => write!(f, "Malformed status response: {err}"),
            ProbeErr::Json(err) => write!(f, "Status response json formatting is invalid: {err}"),
            ProbeErr::TimedOut(after) => write!(f, "No status response after {after:?}"),
            ProbeErr::Cancelled => write!(f, "Status request cancelled"),
        }
    }
}

/// Handshake followed by the status request, both sent in a single write
pub fn status_request_bytes(options: &ProbeOptions) -> BytesMut {
    let mut packets = build_packet(
        HANDSHAKE_ID,
        &[
            &encode_var_int(options.protocol_version as u32)[..],
            &encode_string(&options.host)[..],
            &options.port.to_be_bytes()[..],
            &encode_var_int(NEXT_STATE_STATUS)[..],
        ],
    );
    packets.extend_from_slice(&build_packet(STATUS_REQUEST_ID, &[]));
    packets
}

fn parse_status_body(body: &[u8]) -> Result<ServerStatus, ProbeErr> {
    let (json, _) = decode_string(body, 0).map_err(CodecError::within_frame)?;
    let response = serde_json::from_str::<StatusResponse>(&json)?;
    Ok(ServerStatus::from(response))
}

/// Runs a single status exchange with no time limit. Any bytes are accumulated until the first complete
/// status response frame arrives, frames carrying any other packet id are skipped.
pub async fn try_probe<C: Connector>(
    connector: &C,
    options: &ProbeOptions,
) -> Result<ServerStatus, ProbeErr> {
    if options.host.len() > MAX_HOST_LEN {
        return Err(ProbeErr::InvalidHost(options.host.len()));
    }

    let mut stream = connector.connect(&options.host, options.port).await?;
    trace!("connected");

    stream.write_all(&status_request_bytes(options)).await?;
    stream.flush().await?;

    let mut decoder = PacketDecoder::new();
    let mut chunk = [0; READ_CHUNK_SIZE];

    loop {
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            return Err(ProbeErr::UnexpectedEof);
        }
        decoder.queue_slice(&chunk[..read]);
        trace!(buffered = decoder.buffered(), "received {read} bytes");

        while let Some(frame) = decoder.try_next_packet()? {
            if frame.id != STATUS_RESPONSE_ID {
                debug!(name: LOG_ONLY, "Ignoring unexpected packet id: {:#04x}", frame.id);
                continue;
            }

            let status = parse_status_body(&frame.body)?;

            if let Err(err) = stream.shutdown().await {
                trace!("{err}, during shutdown");
            }
            return Ok(status);
        }
    }
}

/// Probes the server over TCP, see [`get_server_status_until`]
pub async fn get_server_status(options: &ProbeOptions) -> ServerStatus {
    get_server_status_with(&TcpConnector, options).await
}

/// See [`get_server_status_until`]
pub async fn get_server_status_with<C: Connector>(
    connector: &C,
    options: &ProbeOptions,
) -> ServerStatus {
    get_server_status_until(connector, options, std::future::pending()).await
}

/// Resolves to the server's status, never fails. A transport error, a protocol violation, the timeout
/// elapsing or `cancel` completing all resolve to [`ServerStatus::offline`]. The connection is dropped on
/// every one of those paths.
#[instrument(level = "debug", skip_all, fields(host = %options.host, port = options.port))]
pub async fn get_server_status_until<C, F>(
    connector: &C,
    options: &ProbeOptions,
    cancel: F,
) -> ServerStatus
where
    C: Connector,
    F: Future<Output = ()>,
{
    let res = tokio::select! {
        res = tokio::time::timeout(options.timeout, try_probe(connector, options)) => {
            res.unwrap_or(Err(ProbeErr::TimedOut(options.timeout)))
        }
        () = cancel => Err(ProbeErr::Cancelled),
    };

    match res {
        Ok(status) => {
            debug!(players = status.players, max = status.max, "online");
            status
        }
        Err(err) if err.is_protocol_violation() => {
            warn!(name: LOG_ONLY, "{}:{}, {err}", options.host, options.port);
            ServerStatus::offline()
        }
        Err(err) => {
            debug!("{err}");
            ServerStatus::offline()
        }
    }
}
