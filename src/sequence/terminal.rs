//! Terminal operators.
//!
//! Every operator here pulls from the sequence's current position and leaves
//! the cursor where it stopped: short-circuiting operators stay on the
//! element that decided the result, full scans leave the sequence exhausted.

use std::{hash::Hash, ops::Add};

use crate::{
    collections::{Dictionary, Lookup},
    sequence::{DuplicateKeyPolicy, Sequence, ToDictionaryOptions},
    util::{Result, Status},
};

/// Per-element state handed to the action of [`Sequence::each`]
#[derive(Debug)]
pub struct EachContext<R> {
    /// Zero-based position relative to where `each` started
    pub index: usize,
    pub is_first: bool,
    /// Carried from one call to the next and returned at the end
    pub result: Option<R>,
    /// Set to true to stop after this element
    pub cancel: bool,
}

impl<'a, K: 'a, V: 'a> Sequence<'a, K, V> {
    /// Number of remaining elements
    ///
    /// Answers from `remaining()` without moving the cursor when the source
    /// knows its length, otherwise scans to the end.
    pub fn count(&mut self) -> Result<usize> {
        if let Some(n) = self.cursor.remaining() {
            return Ok(n);
        }
        let mut n = 0;
        while self.cursor.valid()? {
            n += 1;
            self.cursor.advance()?;
        }
        Ok(n)
    }

    /// True if every remaining element matches; stops at the first one that
    /// doesn't
    pub fn all<P>(&mut self, mut predicate: P) -> Result<bool>
    where
        P: FnMut(&V) -> bool,
    {
        while self.cursor.valid()? {
            if !predicate(self.cursor.value()?) {
                return Ok(false);
            }
            self.cursor.advance()?;
        }
        Ok(true)
    }

    /// True if at least one element remains
    pub fn any(&mut self) -> Result<bool> {
        self.cursor.valid()
    }

    /// True if some remaining element matches; stops on it
    pub fn any_by<P>(&mut self, mut predicate: P) -> Result<bool>
    where
        P: FnMut(&V) -> bool,
    {
        while self.cursor.valid()? {
            if predicate(self.cursor.value()?) {
                return Ok(true);
            }
            self.cursor.advance()?;
        }
        Ok(false)
    }

    pub fn contains(&mut self, item: &V) -> Result<bool>
    where
        V: PartialEq,
    {
        self.any_by(|v| v == item)
    }

    pub fn first_or_default(&mut self, default: V) -> Result<V>
    where
        V: Clone,
    {
        if self.cursor.valid()? {
            return Ok(self.cursor.value()?.clone());
        }
        Ok(default)
    }

    pub fn first_or_default_by<P>(&mut self, predicate: P, default: V) -> Result<V>
    where
        V: Clone,
        P: FnMut(&V) -> bool,
    {
        if self.any_by(predicate)? {
            return Ok(self.cursor.value()?.clone());
        }
        Ok(default)
    }

    pub fn last_or_default(&mut self, default: V) -> Result<V>
    where
        V: Clone,
    {
        self.last_or_default_by(|_| true, default)
    }

    /// Scans to the end; the last matching element wins
    pub fn last_or_default_by<P>(&mut self, mut predicate: P, default: V) -> Result<V>
    where
        V: Clone,
        P: FnMut(&V) -> bool,
    {
        let mut last = None;
        while self.cursor.valid()? {
            let value = self.cursor.value()?;
            if predicate(value) {
                last = Some(value.clone());
            }
            self.cursor.advance()?;
        }
        Ok(last.unwrap_or(default))
    }

    /// Left fold seeded with the first element; `default` when empty
    pub fn aggregate<F>(&mut self, mut func: F, default: V) -> Result<V>
    where
        V: Clone,
        F: FnMut(V, &V) -> V,
    {
        if !self.cursor.valid()? {
            return Ok(default);
        }
        let mut acc = self.cursor.value()?.clone();
        while self.cursor.advance()? {
            acc = func(acc, self.cursor.value()?);
        }
        Ok(acc)
    }

    /// Smallest element; the earlier one wins a tie
    pub fn min(&mut self, default: V) -> Result<V>
    where
        V: PartialOrd + Clone,
    {
        self.aggregate(|acc, v| if *v < acc { v.clone() } else { acc }, default)
    }

    /// Largest element; the earlier one wins a tie
    pub fn max(&mut self, default: V) -> Result<V>
    where
        V: PartialOrd + Clone,
    {
        self.aggregate(|acc, v| if *v > acc { v.clone() } else { acc }, default)
    }

    /// Sum starting from the first element, so no zero value is needed
    pub fn sum(&mut self, default: V) -> Result<V>
    where
        V: Add<Output = V> + Clone,
    {
        self.aggregate(|acc, v| acc + v.clone(), default)
    }

    /// Element `index` positions after the current one
    ///
    /// Fails with `IndexOutOfRange` if `index` is negative or past the end.
    pub fn element_at(&mut self, index: i64) -> Result<V>
    where
        V: Clone,
    {
        self.element_at_opt(index)?.ok_or_else(|| {
            Status::index_out_of_range(format!("index {index} is out of range"))
        })
    }

    pub fn element_at_or_default(&mut self, index: i64, default: V) -> Result<V>
    where
        V: Clone,
    {
        Ok(self.element_at_opt(index)?.unwrap_or(default))
    }

    fn element_at_opt(&mut self, index: i64) -> Result<Option<V>>
    where
        V: Clone,
    {
        let Ok(mut left) = usize::try_from(index) else {
            return Ok(None);
        };
        while self.cursor.valid()? {
            if left == 0 {
                return Ok(Some(self.cursor.value()?.clone()));
            }
            left -= 1;
            self.cursor.advance()?;
        }
        Ok(None)
    }

    /// Run `action` for every remaining element
    ///
    /// Returns the `result` carried through the context, `None` when there
    /// was no element.
    pub fn each<R, F>(&mut self, mut action: F) -> Result<Option<R>>
    where
        F: FnMut(&K, &V, &mut EachContext<R>),
    {
        let mut ctx = EachContext {
            index: 0,
            is_first: true,
            result: None,
            cancel: false,
        };
        while self.cursor.valid()? {
            let (key, value) = self.cursor.current()?;
            action(key, value, &mut ctx);
            self.cursor.advance()?;
            if ctx.cancel {
                break;
            }
            ctx.index += 1;
            ctx.is_first = false;
        }
        Ok(ctx.result)
    }

    /// Remaining values in order, keys discarded
    pub fn to_vec(&mut self) -> Result<Vec<V>>
    where
        V: Clone,
    {
        let mut out = Vec::with_capacity(self.cursor.remaining().unwrap_or(0));
        while self.cursor.valid()? {
            out.push(self.cursor.value()?.clone());
            self.cursor.advance()?;
        }
        Ok(out)
    }

    /// Dictionary keyed by the cursor's own keys; later duplicates overwrite
    pub fn to_dictionary(&mut self) -> Result<Dictionary<K, V>>
    where
        K: Hash + Eq + Clone,
        V: Clone,
    {
        self.to_dictionary_with(|k, _| k.clone(), ToDictionaryOptions::default())
    }

    /// Dictionary keyed by `key_selector(key, value)`; later duplicates
    /// overwrite
    pub fn to_dictionary_by<D, F>(&mut self, key_selector: F) -> Result<Dictionary<D, V>>
    where
        D: Hash + Eq + Clone,
        V: Clone,
        F: FnMut(&K, &V) -> D,
    {
        self.to_dictionary_with(key_selector, ToDictionaryOptions::default())
    }

    pub fn to_dictionary_with<D, F>(
        &mut self,
        mut key_selector: F,
        options: ToDictionaryOptions<D, V>,
    ) -> Result<Dictionary<D, V>>
    where
        D: Hash + Eq + Clone,
        V: Clone,
        F: FnMut(&K, &V) -> D,
    {
        let mut dict = Dictionary::with_capacity(options.initial_capacity);
        let mut position = 0usize;
        while self.cursor.valid()? {
            let (key, value) = self.cursor.current()?;
            let dict_key = key_selector(key, value);
            if !options.accepts_key(&dict_key) {
                return Err(Status::invalid_argument(format!(
                    "key of element {position} rejected by validator"
                )));
            }
            if !options.accepts_item(value) {
                return Err(Status::invalid_argument(format!(
                    "element {position} rejected by validator"
                )));
            }

            if dict.contains_key(&dict_key) {
                match options.duplicate_keys {
                    DuplicateKeyPolicy::LastWins => {
                        tracing::trace!(position, "duplicate key, overwriting");
                        dict.insert(dict_key, value.clone());
                    },
                    DuplicateKeyPolicy::FirstWins => {
                        tracing::trace!(position, "duplicate key, keeping first");
                    },
                    DuplicateKeyPolicy::Reject => {
                        return Err(Status::invalid_argument(format!(
                            "duplicate key at element {position}"
                        )));
                    },
                }
            } else {
                dict.insert(dict_key, value.clone());
            }

            position += 1;
            self.cursor.advance()?;
        }
        Ok(dict)
    }

    /// Eager grouping of the remaining values by computed key
    pub fn to_lookup<G, F>(&mut self, key_selector: F) -> Result<Lookup<G, V>>
    where
        G: Hash + Eq + Clone,
        V: Clone,
        F: FnMut(&V) -> G,
    {
        Lookup::build(&mut self.cursor, key_selector)
    }
}
