//! Command poll loop driven through the real push channel.

use garage::app::command_loop::{CommandPollLoop, PollOutcome};
use garage::channels::{PushChannel, PushQueue};
use garage::error::CommsError;

use super::mock_hw::{device_id, MockServer, ServerCall};

#[test]
fn first_token_after_boot_never_pushes() {
    let ch = PushChannel::new();
    let mut q = PushQueue::new(&ch);
    let mut lp = CommandPollLoop::new(&device_id());
    let mut srv = MockServer::with_tokens(&["already-pressed-before-boot"]);

    assert_eq!(lp.poll(&mut srv, &mut q), PollOutcome::Armed);
    assert!(ch.try_receive().is_err());
}

#[test]
fn token_change_queues_exactly_one_push() {
    let ch = PushChannel::new();
    let mut q = PushQueue::new(&ch);
    let mut lp = CommandPollLoop::new(&device_id());
    let mut srv = MockServer::with_tokens(&["t1", "t1", "t2", "t2"]);

    let outcomes: Vec<_> = (0..4).map(|_| lp.poll(&mut srv, &mut q)).collect();
    assert_eq!(
        outcomes,
        vec![
            PollOutcome::Armed,
            PollOutcome::Unchanged,
            PollOutcome::PushRequested,
            PollOutcome::Unchanged,
        ]
    );
    assert!(ch.try_receive().is_ok());
    assert!(ch.try_receive().is_err());
}

#[test]
fn echoes_last_consumed_token_with_device_id() {
    let ch = PushChannel::new();
    let mut q = PushQueue::new(&ch);
    let mut lp = CommandPollLoop::new(&device_id());
    let mut srv = MockServer::with_tokens(&["t1", "t2"]);

    lp.poll(&mut srv, &mut q);
    lp.poll(&mut srv, &mut q);

    assert_eq!(srv.tokens_sent(), vec![None, Some("t1".to_string())]);
    assert!(srv.calls.iter().all(|c| matches!(
        c,
        ServerCall::Token { device_id, .. } if device_id == "GD-1A2B3C"
    )));
}

#[test]
fn presses_while_pending_collapse_into_one() {
    let ch = PushChannel::new();
    let mut q = PushQueue::new(&ch);
    let mut lp = CommandPollLoop::new(&device_id());
    let mut srv = MockServer::with_tokens(&["t0", "t1", "t2", "t3"]);

    lp.poll(&mut srv, &mut q);
    assert_eq!(lp.poll(&mut srv, &mut q), PollOutcome::PushRequested);
    assert_eq!(lp.poll(&mut srv, &mut q), PollOutcome::PushCollapsed);

    // Push worker drains the slot; the next new token queues again.
    assert!(ch.try_receive().is_ok());
    assert_eq!(lp.poll(&mut srv, &mut q), PollOutcome::PushRequested);
}

#[test]
fn outage_then_new_token_pushes_once() {
    let ch = PushChannel::new();
    let mut q = PushQueue::new(&ch);
    let mut lp = CommandPollLoop::new(&device_id());
    let mut srv = MockServer::default();
    srv.push_reply(Ok("t1"));
    srv.push_reply(Err(CommsError::Transport));
    srv.push_reply(Err(CommsError::HttpStatus(503)));
    srv.push_reply(Err(CommsError::MalformedResponse));
    srv.push_reply(Ok("t2"));

    lp.poll(&mut srv, &mut q);
    for _ in 0..3 {
        assert!(matches!(lp.poll(&mut srv, &mut q), PollOutcome::ExchangeFailed(_)));
    }
    assert_eq!(lp.poll(&mut srv, &mut q), PollOutcome::PushRequested);

    // Every retry during the outage still sent the last consumed token.
    assert_eq!(
        srv.tokens_sent(),
        vec![
            None,
            Some("t1".to_string()),
            Some("t1".to_string()),
            Some("t1".to_string()),
            Some("t1".to_string()),
        ]
    );
}
