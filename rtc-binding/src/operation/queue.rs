use std::collections::VecDeque;
use std::time::Instant;

use log::{debug, warn};
use shared::error::{Error, Result};

use super::{Completion, Operation, Request, Settlement};

/// Single-flight FIFO queue of negotiation requests.
///
/// Requests are written in with `handle_write`, operations ready for the
/// engine are polled out with `poll_write`, completion signals are read in
/// with `handle_read` and settled requests are polled out with `poll_read`.
/// Callers settle every polled [`Settlement`] before dispatching the polled
/// operations, so a request's handler runs before the next operation reaches
/// the engine.
///
/// At most one completion-awaiting request is in flight. Requests are
/// released for dispatch in the order they were written and a failure never
/// discards the backlog.
#[derive(Default)]
pub struct OperationQueue {
    in_flight: Option<Request>,
    backlog: VecDeque<Request>,
    read_outs: VecDeque<Settlement>,
    write_outs: VecDeque<Operation>,
    is_closed: bool,
}

impl OperationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// The operation waiting for a completion signal, if any.
    pub fn in_flight(&self) -> Option<&Operation> {
        self.in_flight.as_ref().map(Request::operation)
    }

    pub fn backlog_len(&self) -> usize {
        self.backlog.len()
    }

    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    fn start(&mut self, request: Request) {
        self.write_outs.push_back(request.operation().clone());
        if request.awaits_completion() {
            self.in_flight = Some(request);
        } else {
            // nothing will answer it, so it succeeds once released
            self.read_outs.push_back(Settlement {
                request,
                outcome: Ok(None),
            });
        }
    }

    fn pump(&mut self) {
        while self.in_flight.is_none() {
            let Some(request) = self.backlog.pop_front() else {
                break;
            };
            self.start(request);
        }
    }
}

impl sansio::Protocol<Completion, Request, ()> for OperationQueue {
    type Rout = Settlement;
    type Wout = Operation;
    type Eout = ();
    type Error = Error;
    type Time = Instant;

    fn handle_read(&mut self, completion: Completion) -> Result<()> {
        let Some(request) = self.in_flight.take() else {
            warn!("drop {completion:?} with no operation in flight");
            return Ok(());
        };

        let outcome = match completion {
            Completion::Succeeded(payload) => Ok(payload),
            Completion::Failed(message) => Err(request.operation().classify(message)),
        };
        debug!(
            "{} {}, {} queued",
            request.operation(),
            if outcome.is_ok() { "succeeded" } else { "failed" },
            self.backlog.len()
        );

        self.read_outs.push_back(Settlement { request, outcome });
        self.pump();
        Ok(())
    }

    fn poll_read(&mut self) -> Option<Self::Rout> {
        self.read_outs.pop_front()
    }

    fn handle_write(&mut self, request: Request) -> Result<()> {
        if self.is_closed {
            return Err(Error::ErrConnectionClosed);
        }

        if self.in_flight.is_some() {
            debug!(
                "queue {} behind {} pending",
                request.operation(),
                self.backlog.len() + 1
            );
            self.backlog.push_back(request);
        } else {
            self.start(request);
        }
        Ok(())
    }

    fn poll_write(&mut self) -> Option<Self::Wout> {
        self.write_outs.pop_front()
    }

    fn handle_event(&mut self, _evt: ()) -> Result<()> {
        Ok(())
    }

    fn poll_event(&mut self) -> Option<Self::Eout> {
        None
    }

    fn handle_timeout(&mut self, _now: Instant) -> Result<()> {
        Ok(())
    }

    fn poll_timeout(&mut self) -> Option<Instant> {
        None
    }

    /// close fails the in-flight request and the whole backlog with
    /// [`Error::ErrConnectionClosed`]; later writes are rejected.
    fn close(&mut self) -> Result<()> {
        if self.is_closed {
            return Ok(());
        }
        self.is_closed = true;
        self.write_outs.clear();

        let pending = self.in_flight.take().into_iter().chain(self.backlog.drain(..));
        let settlements: Vec<Settlement> = pending
            .map(|request| Settlement {
                request,
                outcome: Err(Error::ErrConnectionClosed),
            })
            .collect();
        debug!("close operation queue, failing {} requests", settlements.len());
        self.read_outs.extend(settlements);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::peer_connection::configuration::offer_answer_options::RTCOfferOptions;
    use crate::peer_connection::sdp::RTCSessionDescription;
    use sansio::Protocol;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    fn request(log: &Log, name: &str, operation: Operation) -> Request {
        let (ok_log, err_log) = (Rc::clone(log), Rc::clone(log));
        let (ok_name, err_name) = (name.to_owned(), name.to_owned());
        Request::new(
            operation,
            move |payload| {
                ok_log
                    .borrow_mut()
                    .push(format!("{ok_name} ok {}", payload.unwrap_or_default()))
            },
            move |err| err_log.borrow_mut().push(format!("{err_name} err {err}")),
        )
    }

    fn offer() -> Operation {
        Operation::CreateOffer(RTCOfferOptions::default())
    }

    fn remote() -> Operation {
        Operation::SetRemoteDescription(Some(RTCSessionDescription::answer("sdp".to_owned())))
    }

    fn settle_all(queue: &mut OperationQueue) {
        while let Some(settlement) = queue.poll_read() {
            settlement.settle();
        }
    }

    fn dispatched(queue: &mut OperationQueue) -> Vec<&'static str> {
        let mut names = vec![];
        while let Some(operation) = queue.poll_write() {
            names.push(operation.name());
        }
        names
    }

    #[test]
    fn test_single_flight_fifo() -> Result<()> {
        let log = Log::default();
        let mut queue = OperationQueue::new();

        queue.handle_write(request(&log, "a", offer()))?;
        queue.handle_write(request(&log, "b", remote()))?;
        queue.handle_write(request(&log, "c", offer()))?;

        assert_eq!(dispatched(&mut queue), vec!["create_offer"]);
        assert_eq!(queue.backlog_len(), 2);

        queue.handle_read(Completion::Succeeded(Some("sdp-a".to_owned())))?;
        settle_all(&mut queue);
        assert_eq!(dispatched(&mut queue), vec!["set_remote_description"]);

        queue.handle_read(Completion::Succeeded(None))?;
        settle_all(&mut queue);
        assert_eq!(dispatched(&mut queue), vec!["create_offer"]);

        queue.handle_read(Completion::Succeeded(Some("sdp-c".to_owned())))?;
        settle_all(&mut queue);
        assert!(dispatched(&mut queue).is_empty());
        assert!(queue.in_flight().is_none());

        assert_eq!(*log.borrow(), vec!["a ok sdp-a", "b ok ", "c ok sdp-c"]);
        Ok(())
    }

    #[test]
    fn test_failure_does_not_stall_queue() -> Result<()> {
        let log = Log::default();
        let mut queue = OperationQueue::new();

        queue.handle_write(request(&log, "a", remote()))?;
        queue.handle_write(request(&log, "b", offer()))?;
        assert_eq!(dispatched(&mut queue), vec!["set_remote_description"]);

        queue.handle_read(Completion::Failed("Called in wrong state: kStable".to_owned()))?;
        settle_all(&mut queue);
        assert_eq!(dispatched(&mut queue), vec!["create_offer"]);

        assert_eq!(
            *log.borrow(),
            vec!["a err invalid state: Called in wrong state: kStable"]
        );
        Ok(())
    }

    #[test]
    fn test_non_awaiting_request_does_not_block() -> Result<()> {
        let log = Log::default();
        let mut queue = OperationQueue::new();

        queue.handle_write(request(&log, "restart", Operation::RestartIce))?;
        queue.handle_write(request(&log, "a", offer()))?;
        settle_all(&mut queue);

        assert_eq!(dispatched(&mut queue), vec!["restart_ice", "create_offer"]);
        assert_eq!(queue.in_flight(), Some(&offer()));
        assert_eq!(*log.borrow(), vec!["restart ok "]);
        Ok(())
    }

    #[test]
    fn test_uncorrelated_completion_is_dropped() -> Result<()> {
        let log = Log::default();
        let mut queue = OperationQueue::new();

        queue.handle_read(Completion::Succeeded(None))?;
        assert!(queue.poll_read().is_none());

        queue.handle_write(request(&log, "a", offer()))?;
        assert_eq!(dispatched(&mut queue), vec!["create_offer"]);
        queue.handle_read(Completion::Succeeded(Some("sdp".to_owned())))?;
        settle_all(&mut queue);

        assert_eq!(*log.borrow(), vec!["a ok sdp"]);
        Ok(())
    }

    #[test]
    fn test_close_fails_pending_requests() -> Result<()> {
        let log = Log::default();
        let mut queue = OperationQueue::new();

        queue.handle_write(request(&log, "a", offer()))?;
        queue.handle_write(request(&log, "b", remote()))?;
        dispatched(&mut queue);

        queue.close()?;
        settle_all(&mut queue);
        assert!(queue.is_closed());
        assert_eq!(
            *log.borrow(),
            vec!["a err connection closed", "b err connection closed"]
        );

        assert_eq!(
            queue
                .handle_write(request(&log, "c", offer()))
                .unwrap_err(),
            Error::ErrConnectionClosed
        );

        // a late completion for the failed request settles nothing twice
        queue.handle_read(Completion::Succeeded(None))?;
        assert!(queue.poll_read().is_none());
        assert_eq!(log.borrow().len(), 2);
        Ok(())
    }
}
