//! Serialized access to the engine, with transaction-scoped lock ownership.
//!
//! Every engine call runs under one reentrant lock. Beginning a transaction
//! keeps the lock held by the calling thread until the outermost level ends,
//! so no other thread's call can interleave with an open transaction.

use std::{
    cell::RefCell,
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use parking_lot::{lock_api::ArcReentrantMutexGuard, RawMutex, RawThreadId, ReentrantMutex};
use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    gateway::Gateway,
    session::Session,
};

struct Levels {
    session: Session,
    /// Identity of each open nesting level, innermost last
    ids: Vec<u64>,
    next_id: u64,
    /// Liveness flag shared by every token of the open outermost transaction
    open: Option<Arc<AtomicBool>>,
}

type Shared = Arc<ReentrantMutex<RefCell<Levels>>>;
type HeldLock = ArcReentrantMutexGuard<RawMutex, RawThreadId, RefCell<Levels>>;

#[derive(Clone)]
pub struct ConcurrencyGuard {
    lock: Shared,
    gateway: Arc<Gateway>,
}

thread_local! {
    /// Transactions opened through the token-less API, per guard
    static OPEN_TRANSACTIONS: RefCell<HashMap<usize, Vec<Transaction>>> = RefCell::new(HashMap::new());
}

impl ConcurrencyGuard {
    pub fn new(gateway: Gateway) -> Self {
        let levels = Levels { session: Session::new(), ids: Vec::new(), next_id: 0, open: None };
        Self { lock: Arc::new(ReentrantMutex::new(RefCell::new(levels))), gateway: Arc::new(gateway) }
    }

    /// Run `f` with the lock held. The lock is released on every exit path.
    pub fn run<T>(&self, f: impl FnOnce(&Gateway) -> Result<T>) -> Result<T> {
        let _held = self.lock.lock();
        f(&self.gateway)
    }

    /// Begin a transaction level. The outermost level's token keeps the lock
    /// held until it ends.
    pub fn begin(&self) -> Result<Transaction> {
        let held = self.lock.lock_arc();
        let (id, open, outermost) = {
            let mut levels = held.borrow_mut();
            // on failure `held` drops here and the lock is released
            levels.session.begin(self.gateway.as_ref())?;
            let id = levels.next_id;
            levels.next_id += 1;
            levels.ids.push(id);
            match levels.open.clone() {
                Some(open) => (id, open, false),
                None => {
                    let open = Arc::new(AtomicBool::new(true));
                    levels.open = Some(open.clone());
                    (id, open, true)
                }
            }
        };
        // nested levels rely on the outermost token's hold
        let held = outermost.then_some(held);
        Ok(Transaction { held, lock: self.lock.clone(), open, gateway: self.gateway.clone(), id, ended: false })
    }

    /// Whether any thread currently holds the lock
    pub fn is_locked(&self) -> bool { self.lock.is_locked() }

    /// Whether the calling thread has a transaction open. Never blocks.
    pub fn in_transaction(&self) -> bool {
        match self.lock.try_lock() {
            Some(held) => held.borrow().session.in_transaction(),
            None => false,
        }
    }

    pub fn transaction_depth(&self) -> usize { self.lock.try_lock().map(|held| held.borrow().session.depth()).unwrap_or(0) }

    pub fn begin_transaction(&self) -> Result<()> {
        let transaction = self.begin()?;
        OPEN_TRANSACTIONS.with(|open| open.borrow_mut().entry(self.key()).or_default().push(transaction));
        Ok(())
    }

    pub fn set_transaction_successful(&self) -> Result<()> {
        OPEN_TRANSACTIONS.with(|open| match open.borrow().get(&self.key()).and_then(|stack| stack.last()) {
            Some(transaction) => transaction.mark_successful(),
            None => Err(Error::NotInTransaction),
        })
    }

    pub fn end_transaction(&self) -> Result<()> {
        let transaction = OPEN_TRANSACTIONS.with(|open| {
            let mut open = open.borrow_mut();
            let stack = open.get_mut(&self.key())?;
            let transaction = stack.pop();
            if stack.is_empty() {
                open.remove(&self.key());
            }
            transaction
        });
        transaction.ok_or(Error::NotInTransaction)?.end()
    }

    fn key(&self) -> usize { Arc::as_ptr(&self.lock) as usize }
}

/// One open transaction level.
///
/// Ending the token ends its level. A token dropped without [`Transaction::end`]
/// ends its level as unsuccessful. Ending a level also ends any deeper levels
/// still open, as unsuccessful. Only the outermost token holds the guard's
/// lock, so the lock is released as soon as the outermost level ends, even
/// while tokens of its inner levels are still alive.
pub struct Transaction {
    /// Set for the outermost level only
    held: Option<HeldLock>,
    lock: Shared,
    open: Arc<AtomicBool>,
    gateway: Arc<Gateway>,
    id: u64,
    ended: bool,
}

impl Transaction {
    fn is_live(&self) -> bool { !self.ended && self.open.load(Ordering::Acquire) }

    pub fn mark_successful(&self) -> Result<()> {
        if !self.is_live() {
            return Err(Error::NotInTransaction);
        }
        // reentrant: the outermost token on this thread holds the lock
        let held = self.lock.lock();
        let mut levels = held.borrow_mut();
        let index = levels.ids.iter().position(|id| *id == self.id).ok_or(Error::NotInTransaction)?;
        levels.session.mark_level_successful(index)
    }

    pub fn end(mut self) -> Result<()> { self.finish(false) }

    fn finish(&mut self, dropped: bool) -> Result<()> {
        // an enclosing level already ended this one
        if !self.is_live() {
            self.ended = true;
            self.held = None;
            return Ok(());
        }
        self.ended = true;

        let result = {
            let held = self.lock.lock();
            let mut levels = held.borrow_mut();
            let Some(index) = levels.ids.iter().position(|id| *id == self.id) else { return Ok(()) };
            if dropped {
                warn!("transaction dropped without end, ending level {} unsuccessfully", index + 1);
            }

            let mut result = Ok(());
            while levels.ids.len() > index {
                if levels.ids.len() > index + 1 {
                    warn!("ending nested transaction level {} left open", levels.ids.len());
                }
                levels.ids.pop();
                let ended = levels.session.end(self.gateway.as_ref());
                if result.is_ok() {
                    result = ended;
                }
            }
            if !levels.session.in_transaction() {
                if let Some(open) = levels.open.take() {
                    open.store(false, Ordering::Release);
                }
                debug!("outermost transaction ended, releasing lock");
            }
            result
        };
        self.held = None;
        result
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if let Err(err) = self.finish(true) {
            warn!("failed to end dropped transaction: {}", err);
        }
    }
}
