//! End-to-end checks of the discover → count → group → report pipeline,
//! run against an in-memory directory.

#[cfg(test)]
mod discovery;
#[cfg(test)]
mod support;
