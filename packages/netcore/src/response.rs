use alloc::vec::Vec;
use core::fmt;

/// Initial reservation for bodies that arrive without `Content-Length`.
const UNKNOWN_LENGTH_CHUNK: usize = 512;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResponseEnvelope {
    pub status: u16,
    pub content_length: Option<usize>,
}

impl ResponseEnvelope {
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocError {
    OverBudget { requested: usize, budget: usize },
    OutOfMemory { requested: usize },
}

impl AllocError {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OverBudget { .. } => "over_budget",
            Self::OutOfMemory { .. } => "out_of_memory",
        }
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OverBudget { requested, budget } => {
                write!(f, "{} requested={} budget={}", self.as_str(), requested, budget)
            }
            Self::OutOfMemory { requested } => {
                write!(f, "{} requested={}", self.as_str(), requested)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyError {
    NotAllocated,
    Overrun { limit: usize },
    Short { expected: usize, received: usize },
    OutOfMemory,
}

impl BodyError {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotAllocated => "not_allocated",
            Self::Overrun { .. } => "overrun",
            Self::Short { .. } => "short",
            Self::OutOfMemory => "out_of_memory",
        }
    }
}

impl fmt::Display for BodyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overrun { limit } => write!(f, "{} limit={}", self.as_str(), limit),
            Self::Short { expected, received } => write!(
                f,
                "{} expected={} received={}",
                self.as_str(),
                expected,
                received
            ),
            _ => f.write_str(self.as_str()),
        }
    }
}

/// Owned response body buffer.
///
/// With a declared length `L` exactly `L + 1` bytes are reserved up front and
/// a finished buffer holds the `L` body bytes followed by a `0` terminator.
/// Without a declared length the buffer grows up to `budget` bytes.
#[derive(Debug)]
pub struct ResponseBody {
    buf: Vec<u8>,
    declared: Option<usize>,
    budget: usize,
    allocated: bool,
    finished: bool,
}

impl ResponseBody {
    pub const fn new(budget: usize) -> Self {
        Self {
            buf: Vec::new(),
            declared: None,
            budget,
            allocated: false,
            finished: false,
        }
    }

    pub fn allocate(&mut self, content_length: Option<usize>) -> Result<(), AllocError> {
        self.buf = Vec::new();
        self.allocated = false;
        self.finished = false;
        self.declared = content_length;

        let requested = match content_length {
            Some(len) if len > self.budget => {
                return Err(AllocError::OverBudget {
                    requested: len,
                    budget: self.budget,
                })
            }
            Some(len) => len.saturating_add(1),
            None => UNKNOWN_LENGTH_CHUNK.min(self.budget.saturating_add(1)),
        };
        self.buf
            .try_reserve_exact(requested)
            .map_err(|_| AllocError::OutOfMemory { requested })?;
        self.allocated = true;
        Ok(())
    }

    pub fn extend(&mut self, chunk: &[u8]) -> Result<(), BodyError> {
        if !self.allocated || self.finished {
            return Err(BodyError::NotAllocated);
        }
        let limit = self.declared.unwrap_or(self.budget);
        if self.buf.len().saturating_add(chunk.len()) > limit {
            return Err(BodyError::Overrun { limit });
        }
        self.buf
            .try_reserve(chunk.len())
            .map_err(|_| BodyError::OutOfMemory)?;
        self.buf.extend_from_slice(chunk);
        Ok(())
    }

    pub fn finish(&mut self) -> Result<(), BodyError> {
        if !self.allocated {
            return Err(BodyError::NotAllocated);
        }
        if self.finished {
            return Ok(());
        }
        if let Some(expected) = self.declared {
            if self.buf.len() < expected {
                return Err(BodyError::Short {
                    expected,
                    received: self.buf.len(),
                });
            }
        }
        self.buf.try_reserve(1).map_err(|_| BodyError::OutOfMemory)?;
        self.buf.push(0);
        self.finished = true;
        Ok(())
    }

    /// Body bytes without the terminator.
    pub fn body(&self) -> &[u8] {
        if self.finished {
            &self.buf[..self.buf.len() - 1]
        } else {
            &self.buf
        }
    }

    pub fn with_terminator(&self) -> Option<&[u8]> {
        self.finished.then_some(self.buf.as_slice())
    }

    pub fn declared_len(&self) -> Option<usize> {
        self.declared
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    pub fn is_allocated(&self) -> bool {
        self.allocated
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }
}
