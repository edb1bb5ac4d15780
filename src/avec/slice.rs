//! Parsing consecutive records from a slice.

use super::parser::{Error, ParseRecord};

/// Iterate over the records packed back to back at the front of a slice.
///
/// Iteration ends at the first incomplete record, whose bytes are left in
/// [`Records::remainder`], or after yielding the first error. A layout of
/// zero bytes yields nothing, as it would never advance.
pub fn parse_all<'p, 'a, P: ParseRecord>(parser: &'p P, r: &'a [u8]) -> Records<'p, 'a, P> {
    Records {
        parser,
        r,
        done: parser.size() == 0,
    }
}

/// Iterator returned by [`parse_all`].
#[derive(Debug)]
pub struct Records<'p, 'a, P> {
    parser: &'p P,
    r: &'a [u8],
    done: bool,
}

impl<'a, P> Records<'_, 'a, P> {
    /// Bytes not yet consumed by a record.
    pub fn remainder(&self) -> &'a [u8] {
        self.r
    }
}

impl<P: ParseRecord> Iterator for Records<'_, '_, P> {
    type Item = Result<P::Output, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.parser.parse(self.r) {
            Ok((Some(value), leftover)) => {
                self.r = leftover;
                Some(Ok(value))
            }
            Ok((None, _)) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
