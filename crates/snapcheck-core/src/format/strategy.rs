use std::borrow::Borrow;
use std::sync::Arc;

use crate::diff::model::{DiffResult, DiffStrategy};
use crate::errors::Result;

type SerializeFn<V, F> = Arc<dyn Fn(&V) -> Result<F> + Send + Sync>;
type DeserializeFn<F> = Arc<dyn Fn(&[u8]) -> F + Send + Sync>;
type ToBytesFn<F> = Arc<dyn Fn(&F) -> Result<Vec<u8>> + Send + Sync>;
type EmptyReferenceFn = Arc<dyn Fn(&[u8]) -> bool + Send + Sync>;

fn zero_bytes(bytes: &[u8]) -> bool {
    bytes.is_empty()
}

/// How a value of type `V` becomes a storable, comparable format `F`
///
/// A strategy bundles the serializer, the on-disk byte coding, the empty
/// reference policy and the [`DiffStrategy`] used to compare formats.
/// All parts are shared closures, so cloning is cheap.
///
/// Law: `deserialize(to_bytes(x)) == x` for every `x` the strategy produces,
/// and `deserialize` never panics.
pub struct FormatStrategy<V: ?Sized, F> {
    path_extension: Option<String>,
    serialize: SerializeFn<V, F>,
    deserialize: DeserializeFn<F>,
    to_bytes: ToBytesFn<F>,
    is_empty_reference: EmptyReferenceFn,
    diffing: Arc<dyn DiffStrategy<F>>,
}

impl<V: ?Sized, F> Clone for FormatStrategy<V, F> {
    fn clone(&self) -> Self {
        Self {
            path_extension: self.path_extension.clone(),
            serialize: Arc::clone(&self.serialize),
            deserialize: Arc::clone(&self.deserialize),
            to_bytes: Arc::clone(&self.to_bytes),
            is_empty_reference: Arc::clone(&self.is_empty_reference),
            diffing: Arc::clone(&self.diffing),
        }
    }
}

impl<V: ?Sized, F> std::fmt::Debug for FormatStrategy<V, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatStrategy")
            .field("path_extension", &self.path_extension)
            .finish_non_exhaustive()
    }
}

impl<V: ?Sized, F> FormatStrategy<V, F> {
    /// Build a strategy whose empty reference policy is "zero bytes"
    pub fn new(
        path_extension: Option<&str>,
        diffing: impl DiffStrategy<F> + 'static,
        serialize: impl Fn(&V) -> Result<F> + Send + Sync + 'static,
        deserialize: impl Fn(&[u8]) -> F + Send + Sync + 'static,
        to_bytes: impl Fn(&F) -> Result<Vec<u8>> + Send + Sync + 'static,
    ) -> Self {
        Self {
            path_extension: path_extension.map(str::to_string),
            serialize: Arc::new(serialize),
            deserialize: Arc::new(deserialize),
            to_bytes: Arc::new(to_bytes),
            is_empty_reference: Arc::new(zero_bytes),
            diffing: Arc::new(diffing),
        }
    }

    /// Replace the predicate deciding that stored bytes count as no reference
    pub fn with_empty_reference(
        mut self,
        is_empty: impl Fn(&[u8]) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.is_empty_reference = Arc::new(is_empty);
        self
    }

    /// Replace the comparison, keeping serialization and coding
    pub fn with_diffing(mut self, diffing: impl DiffStrategy<F> + 'static) -> Self {
        self.diffing = Arc::new(diffing);
        self
    }

    pub fn with_path_extension(mut self, path_extension: Option<&str>) -> Self {
        self.path_extension = path_extension.map(str::to_string);
        self
    }

    pub fn path_extension(&self) -> Option<&str> {
        self.path_extension.as_deref()
    }

    /// # Errors
    ///
    /// Whatever the serializer rejects, typically `ExErrorKind::Serialization`
    pub fn serialize(&self, value: &V) -> Result<F> {
        (self.serialize)(value)
    }

    pub fn deserialize(&self, bytes: &[u8]) -> F {
        (self.deserialize)(bytes)
    }

    /// # Errors
    ///
    /// Whatever the encoder rejects, e.g. `ExErrorKind::ImageCoding`
    pub fn to_bytes(&self, format: &F) -> Result<Vec<u8>> {
        (self.to_bytes)(format)
    }

    pub fn is_empty_reference(&self, bytes: &[u8]) -> bool {
        (self.is_empty_reference)(bytes)
    }

    pub fn compare(&self, reference: &F, actual: &F) -> Option<DiffResult> {
        self.diffing.compare(reference, actual)
    }

    pub fn diffing(&self) -> &dyn DiffStrategy<F> {
        self.diffing.as_ref()
    }
}

impl<V, F> FormatStrategy<V, F>
where
    V: ?Sized + 'static,
    F: 'static,
{
    /// Derive a strategy for `W` by first transforming it into `V`
    ///
    /// The derived strategy shares extension, byte coding, empty reference
    /// policy and diffing with `self`.
    ///
    /// ```
    /// use snapcheck_core::format::lines;
    ///
    /// let joined = lines().pullback(|items: &Vec<String>| items.join("\n"));
    /// let format = joined.serialize(&vec!["a".to_string(), "b".to_string()]).unwrap();
    /// assert_eq!(format, "a\nb");
    /// ```
    pub fn pullback<W, T>(
        &self,
        transform: impl Fn(&W) -> T + Send + Sync + 'static,
    ) -> FormatStrategy<W, F>
    where
        W: ?Sized + 'static,
        T: Borrow<V> + 'static,
    {
        let inner = Arc::clone(&self.serialize);
        FormatStrategy {
            path_extension: self.path_extension.clone(),
            serialize: Arc::new(move |value: &W| inner(Borrow::<V>::borrow(&transform(value)))),
            deserialize: Arc::clone(&self.deserialize),
            to_bytes: Arc::clone(&self.to_bytes),
            is_empty_reference: Arc::clone(&self.is_empty_reference),
            diffing: Arc::clone(&self.diffing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::BytesDiff;

    fn identity_bytes() -> FormatStrategy<Vec<u8>, Vec<u8>> {
        FormatStrategy::new(
            Some("bin"),
            BytesDiff,
            |v: &Vec<u8>| Ok(v.clone()),
            |b: &[u8]| b.to_vec(),
            |f: &Vec<u8>| Ok(f.clone()),
        )
    }

    #[test]
    fn test_default_empty_reference_policy_is_zero_bytes() {
        let strategy = identity_bytes();
        assert!(strategy.is_empty_reference(&[]));
        assert!(!strategy.is_empty_reference(&[0]));
    }

    #[test]
    fn test_custom_empty_reference_policy() {
        let strategy = identity_bytes().with_empty_reference(|b| b.iter().all(|&x| x == 0));
        assert!(strategy.is_empty_reference(&[0, 0]));
    }

    #[test]
    fn test_pullback_keeps_extension_and_diffing() {
        let strategy = identity_bytes();
        let derived = strategy.pullback(|n: &u32| n.to_le_bytes().to_vec());

        assert_eq!(derived.path_extension(), Some("bin"));
        let a = derived.serialize(&1).unwrap();
        let b = derived.serialize(&2).unwrap();
        assert!(derived.compare(&a, &a).is_none());
        assert!(derived.compare(&a, &b).is_some());
    }

    #[test]
    fn test_clone_shares_behaviour() {
        let strategy = identity_bytes().with_path_extension(Some("dat"));
        let cloned = strategy.clone();
        assert_eq!(cloned.path_extension(), Some("dat"));
        assert_eq!(cloned.deserialize(&[7]), vec![7]);
    }
}
