use crate::domain::{AgentId, AsteroidId, ShipType};
use crate::interface_adapters::protocol::{
    ClientMessage, ResourcesDto, ServerMessage, WorldUpdateDto,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::{
    LedgerService, LedgerUpdate, SessionEvent, SessionHandle, SessionNotice, spawn_session,
};

use axum::{
    Error,
    extract::{
        State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures::SinkExt;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::{broadcast, mpsc};
use tracing::{Instrument, debug, info, info_span, warn};

#[derive(Debug)]
enum NetError {
    // Categorizes connection lifecycle failures so callers can decide policy.
    #[allow(dead_code)]
    Ws(axum::Error),
    #[allow(dead_code)]
    Serialization(serde_json::Error),
    SessionClosed,
    LedgerUpdatesClosed,
}

impl From<axum::Error> for NetError {
    fn from(e: axum::Error) -> Self {
        NetError::Ws(e)
    }
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let session_id = state.next_session_id();
    let span = info_span!("conn", session_id);
    ws.on_upgrade(move |socket| handle_socket(socket, state, session_id).instrument(span))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>, session_id: u64) {
    // Subscribe before the first await so no ledger publish is missed.
    let ledger_rx = state.ledger.subscribe();
    let session = spawn_session(session_id, state.ledger.clone(), state.session_settings);

    let mut ctx = match bootstrap_connection(&mut socket, session, ledger_rx, &state.ledger).await
    {
        Ok(ctx) => ctx,
        Err((session, e)) => {
            warn!(error = ?e, "failed to bootstrap connection");
            session.shutdown.notify_one();
            let _ = socket.close().await;
            return;
        }
    };

    info!("client connected");

    if let Err(e) = run_client_loop(&mut socket, &mut ctx).await {
        warn!(error = ?e, "client loop exited with error");
    }

    // Tear down the per-connection world.
    ctx.session.shutdown.notify_one();
    info!(
        msgs_in = ctx.msgs_in,
        msgs_out = ctx.msgs_out,
        bytes_in = ctx.bytes_in,
        bytes_out = ctx.bytes_out,
        invalid_json = ctx.invalid_json,
        "client disconnected"
    );
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<usize, NetError> {
    // Serialize message safely; log JSON errors instead of panicking
    let txt = serde_json::to_string(msg).map_err(NetError::Serialization)?;
    let bytes = txt.len();
    socket
        .send(Message::Text(txt.into()))
        .await
        .map_err(NetError::Ws)?;
    Ok(bytes)
}

struct ConnCtx {
    session: SessionHandle,
    ledger_rx: broadcast::Receiver<LedgerUpdate>,

    msgs_in: u64,
    msgs_out: u64,
    bytes_in: u64,
    bytes_out: u64,

    invalid_json: u32,

    last_event_full_log: Instant,
    last_ledger_lag_log: Instant,
    last_invalid_input_log: Instant,

    close_frame: Option<CloseFrame>,
}

async fn bootstrap_connection(
    socket: &mut WebSocket,
    session: SessionHandle,
    ledger_rx: broadcast::Receiver<LedgerUpdate>,
    ledger: &LedgerService,
) -> Result<ConnCtx, (SessionHandle, NetError)> {
    let mut msgs_out = 0;
    let mut bytes_out = 0;

    // Tell the client "This is who you are".
    let identity_msg = ServerMessage::Identity {
        session_id: session.session_id.to_string(),
    };
    match send_message(socket, &identity_msg).await {
        Ok(bytes) => {
            msgs_out += 1;
            bytes_out += bytes as u64;
        }
        Err(e) => return Err((session, e)),
    }

    // Initial resources so the HUD is populated before the first publish.
    match ledger.snapshot().await {
        Ok(state) => {
            let msg = ServerMessage::ResourcesUpdated(ResourcesDto::from(state.ledger));
            match send_message(socket, &msg).await {
                Ok(bytes) => {
                    msgs_out += 1;
                    bytes_out += bytes as u64;
                }
                Err(e) => return Err((session, e)),
            }
        }
        Err(e) => warn!(error = e.message(), "initial resources unavailable"),
    }

    let now = Instant::now()
        .checked_sub(LOG_THROTTLE)
        .unwrap_or_else(Instant::now);
    Ok(ConnCtx {
        session,
        ledger_rx,

        msgs_in: 0,
        msgs_out,
        bytes_in: 0,
        bytes_out,

        invalid_json: 0,

        last_event_full_log: now,
        last_ledger_lag_log: now,
        last_invalid_input_log: now,

        close_frame: None,
    })
}

enum LoopControl {
    Continue,
    Disconnect,
}

const LOG_THROTTLE: Duration = Duration::from_secs(2);
const MAX_INVALID_JSON: u32 = 10;

fn should_log(last: &mut Instant) -> bool {
    if last.elapsed() >= LOG_THROTTLE {
        *last = Instant::now();
        true
    } else {
        false
    }
}

// Maps a wire message to a session event; the error is sent back as a rejection.
fn to_session_event(msg: ClientMessage) -> Result<SessionEvent, &'static str> {
    match msg {
        ClientMessage::Position(p) => {
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err("invalid position");
            }
            Ok(SessionEvent::PlayerMoved { position: p.into() })
        }
        ClientMessage::Mine(m) => Ok(SessionEvent::Mine {
            asteroid_id: AsteroidId(m.asteroid_id),
            power: m.power,
        }),
        ClientMessage::MiningMode(m) => Ok(SessionEvent::SetMiningMode { enabled: m.enabled }),
        ClientMessage::Deploy(d) => d
            .ship_type
            .parse::<ShipType>()
            .map(|kind| SessionEvent::Deploy { kind })
            .map_err(|e| e.message()),
        ClientMessage::Recall(r) => Ok(SessionEvent::Recall {
            agent_id: AgentId(r.agent_id),
        }),
    }
}

fn forward_event(
    events_tx: &mpsc::Sender<SessionEvent>,
    event: SessionEvent,
    last_event_full_log: &mut Instant,
) -> Result<LoopControl, NetError> {
    match events_tx.try_send(event) {
        Ok(()) => Ok(LoopControl::Continue),
        Err(mpsc::error::TrySendError::Full(_evt)) => {
            if should_log(last_event_full_log) {
                warn!("session event channel full; dropping event");
            }
            Ok(LoopControl::Continue)
        }
        Err(mpsc::error::TrySendError::Closed(_evt)) => Err(NetError::SessionClosed),
    }
}

async fn run_client_loop(socket: &mut WebSocket, ctx: &mut ConnCtx) -> Result<(), NetError> {
    // Split borrows so `tokio::select!` can hold them concurrently.
    let ConnCtx {
        session,
        ledger_rx,
        msgs_in,
        msgs_out,
        bytes_in,
        bytes_out,
        invalid_json,
        last_event_full_log,
        last_ledger_lag_log,
        last_invalid_input_log,
        close_frame,
    } = ctx;
    let SessionHandle {
        events: events_tx,
        notices: notices_rx,
        world: world_rx,
        ..
    } = session;

    let mut fatal: Option<NetError> = None;

    loop {
        // disconnect becomes true on error
        let disconnect: bool = tokio::select! {
            // Incoming Message from Client
            incoming = socket.recv() => {
                match handle_incoming_ws(
                    socket,
                    incoming,
                    events_tx,
                    msgs_in,
                    msgs_out,
                    bytes_in,
                    bytes_out,
                    invalid_json,
                    last_event_full_log,
                    last_invalid_input_log,
                    close_frame,
                ).await {
                    Ok(LoopControl::Continue) => false,
                    Ok(LoopControl::Disconnect) => true,
                    Err(e) => {
                        fatal = Some(e);
                        true
                    }
                }
            }

            // Outgoing World Update
            changed = world_rx.changed() => {
                match changed {
                    Ok(()) => {
                        // Clone out of the watch so no borrow is held across the send.
                        let update = world_rx.borrow_and_update().clone();
                        let msg = ServerMessage::WorldUpdate(WorldUpdateDto::from(&update));
                        forward_message(socket, &msg, msgs_out, bytes_out).await
                    }
                    Err(_) => {
                        fatal = Some(NetError::SessionClosed);
                        true
                    }
                }
            }

            // Replies from the session (mined, deployed, rejected, ...)
            notice = notices_rx.recv() => {
                match notice {
                    Some(notice) => {
                        forward_notice(socket, &notice, msgs_out, bytes_out).await
                    }
                    None => {
                        fatal = Some(NetError::SessionClosed);
                        true
                    }
                }
            }

            // Ledger totals pushed after writes and production publishes.
            update = ledger_rx.recv() => {
                match update {
                    Ok(update) => {
                        let msg = ServerMessage::ResourcesUpdated(update.ledger.into());
                        forward_message(socket, &msg, msgs_out, bytes_out).await
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        // Only the latest totals matter; the next update resyncs the client.
                        if should_log(last_ledger_lag_log) {
                            warn!(missed = n, "ledger updates lagged");
                        }
                        false
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        fatal = Some(NetError::LedgerUpdatesClosed);
                        true
                    }
                }
            }
        };

        if disconnect {
            if let Some(frame) = close_frame.take() {
                let _ = socket.send(Message::Close(Some(frame))).await;
            }
            if let Err(err) = socket.close().await.map_err(NetError::Ws) {
                debug!(error = ?err, "socket close error");
            }
            break;
        }
    }

    if let Some(err) = fatal {
        Err(err)
    } else {
        Ok(())
    }
}

#[allow(clippy::too_many_arguments)]
async fn handle_incoming_ws(
    socket: &mut WebSocket,
    incoming: Option<Result<Message, Error>>,
    events_tx: &mpsc::Sender<SessionEvent>,
    msgs_in: &mut u64,
    msgs_out: &mut u64,
    bytes_in: &mut u64,
    bytes_out: &mut u64,
    invalid_json: &mut u32,
    last_event_full_log: &mut Instant,
    last_invalid_input_log: &mut Instant,
    close_frame: &mut Option<CloseFrame>,
) -> Result<LoopControl, NetError> {
    match incoming {
        Some(Ok(msg)) => match msg {
            Message::Text(text) => {
                *msgs_in += 1;
                *bytes_in += text.len() as u64;

                let parsed = match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(parsed) => parsed,
                    Err(parse_err) => {
                        *invalid_json += 1;
                        if should_log(last_invalid_input_log) {
                            warn!(
                                bytes = text.len(),
                                error = %parse_err,
                                "failed to parse client message"
                            );
                        }

                        if *invalid_json > MAX_INVALID_JSON {
                            *close_frame = Some(CloseFrame {
                                code: close_code::POLICY,
                                reason: "too many invalid messages".into(),
                            });
                            return Ok(LoopControl::Disconnect);
                        }
                        return Ok(LoopControl::Continue);
                    }
                };

                match to_session_event(parsed) {
                    Ok(event) => forward_event(events_tx, event, last_event_full_log),
                    Err(reason) => {
                        // Rejected before it reaches the session; nothing was created.
                        let msg = ServerMessage::CommandRejected {
                            reason: reason.to_string(),
                        };
                        if forward_message(socket, &msg, msgs_out, bytes_out).await {
                            Ok(LoopControl::Disconnect)
                        } else {
                            Ok(LoopControl::Continue)
                        }
                    }
                }
            }
            Message::Binary(_) => {
                *close_frame = Some(CloseFrame {
                    code: close_code::UNSUPPORTED,
                    reason: "binary messages not supported".into(),
                });
                Ok(LoopControl::Disconnect)
            }
            Message::Ping(_) | Message::Pong(_) => Ok(LoopControl::Continue),
            Message::Close(_) => Ok(LoopControl::Disconnect),
        },
        Some(Err(e)) => {
            warn!(error = %e, "websocket recv error");
            Ok(LoopControl::Disconnect)
        }
        None => {
            info!("websocket closed");
            Ok(LoopControl::Disconnect)
        }
    }
}

async fn forward_notice(
    socket: &mut WebSocket,
    notice: &SessionNotice,
    msgs_out: &mut u64,
    bytes_out: &mut u64,
) -> bool {
    forward_message(socket, &ServerMessage::from_notice(notice), msgs_out, bytes_out).await
}

// Returns true when the connection should be dropped.
async fn forward_message(
    socket: &mut WebSocket,
    msg: &ServerMessage,
    msgs_out: &mut u64,
    bytes_out: &mut u64,
) -> bool {
    match send_message(socket, msg).await {
        Ok(bytes) => {
            *msgs_out += 1;
            *bytes_out += bytes as u64;
            false
        }
        Err(err) => {
            // Log unexpected send failures; disconnect will follow immediately.
            warn!(error = ?err, "failed to send message");
            true
        }
    }
}
