//! Dynamically typed functions with a declared arity.
//!
//! Closures are the normal way to pass predicates and selectors; their arity
//! is checked by the compiler. `Callable` covers the other case: a function
//! value produced at runtime (a script binding, a parsed expression, a table
//! of named functions) whose arity is only known as data. Converting it into
//! a predicate or selector checks the arity right away, so a mismatch fails
//! when the operator is set up rather than on the first element.

use std::{fmt, rc::Rc};

use crate::util::{Result, Status};

/// A function of `arity` arguments of type `A` returning `R`
pub struct Callable<A, R> {
    name: Option<String>,
    arity: usize,
    func: Rc<dyn Fn(&[&A]) -> R>,
}

impl<A, R> Clone for Callable<A, R> {
    fn clone(&self) -> Self {
        Callable {
            name: self.name.clone(),
            arity: self.arity,
            func: Rc::clone(&self.func),
        }
    }
}

impl<A: 'static, R: 'static> Callable<A, R> {
    pub fn new(arity: usize, func: impl Fn(&[&A]) -> R + 'static) -> Self {
        Callable {
            name: None,
            arity,
            func: Rc::new(func),
        }
    }

    pub fn unary(func: impl Fn(&A) -> R + 'static) -> Self {
        Callable::new(1, move |args| func(args[0]))
    }

    pub fn binary(func: impl Fn(&A, &A) -> R + 'static) -> Self {
        Callable::new(2, move |args| func(args[0], args[1]))
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Invoke with an argument list, failing with `InvalidCallable` when the
    /// number of arguments doesn't match the arity
    pub fn call(&self, args: &[&A]) -> Result<R> {
        self.expect_arity(args.len())?;
        Ok((self.func)(args))
    }

    pub fn expect_arity(&self, arity: usize) -> Result<()> {
        if self.arity != arity {
            return Err(Status::invalid_callable(format!(
                "function {} takes {} argument(s), {} required",
                self.name().unwrap_or("<anonymous>"),
                self.arity,
                arity
            )));
        }
        Ok(())
    }

    /// One-argument selector, usable with `select`
    pub fn selector(&self) -> Result<impl FnMut(&A) -> R + use<A, R>> {
        self.expect_arity(1)?;
        let func = Rc::clone(&self.func);
        Ok(move |a: &A| func(&[a]))
    }

    /// Two-argument function, usable as a `(key, value)` key selector or an
    /// aggregate step
    pub fn binary_fn(&self) -> Result<impl FnMut(&A, &A) -> R + use<A, R>> {
        self.expect_arity(2)?;
        let func = Rc::clone(&self.func);
        Ok(move |a: &A, b: &A| func(&[a, b]))
    }
}

impl<A: 'static> Callable<A, bool> {
    /// One-argument predicate, usable with `filter`, `all`, `any_by`, ...
    pub fn predicate(&self) -> Result<impl FnMut(&A) -> bool + use<A>> {
        self.selector()
    }
}

impl<A, R> fmt::Debug for Callable<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unary_predicate() {
        let is_even = Callable::unary(|x: &i32| x % 2 == 0);
        let mut pred = is_even.predicate().unwrap();
        assert!(pred(&4));
        assert!(!pred(&3));
    }

    #[test]
    fn test_arity_mismatch_fails_eagerly() {
        let add = Callable::binary(|a: &i32, b: &i32| a + b).named("add");
        let err = match add.selector() {
            Ok(_) => panic!("binary function accepted as selector"),
            Err(err) => err,
        };
        assert!(err.is_invalid_callable());
        assert_eq!(
            err.message(),
            Some("function add takes 2 argument(s), 1 required")
        );
    }

    #[test]
    fn test_call_checks_argument_count() {
        let add = Callable::binary(|a: &i32, b: &i32| a + b);
        assert_eq!(add.call(&[&1, &2]).unwrap(), 3);
        assert!(add.call(&[&1]).unwrap_err().is_invalid_callable());
    }

    #[test]
    fn test_variadic_construction() {
        let sum = Callable::new(3, |args: &[&i32]| args.iter().copied().sum::<i32>());
        assert_eq!(sum.arity(), 3);
        assert_eq!(sum.call(&[&1, &2, &3]).unwrap(), 6);
        assert!(sum.binary_fn().is_err());
    }
}
