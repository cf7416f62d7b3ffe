use std::cmp::Ordering;
use std::marker::PhantomData;

/// A Comparator object provides a total order over the keys stored
/// in a skip list. The list is built with one comparator and keeps it for
/// its whole lifetime, so an implementation must be consistent: the same
/// pair of keys always compares the same way.
pub trait Comparator<K: ?Sized> {
    /// Three-way comparison. Returns value:
    /// Ordering::Less iff a < b
    /// Ordering::Equal iff a == b
    /// Ordering::Greater iff a > b
    fn compare(&self, a: &K, b: &K) -> Ordering;

    /// The name of comparator, used to tell comparators apart when
    /// debugging.
    fn name(&self) -> &str;
}

/// `NaturalComparator` follows the key's own `Ord` implementation.
pub struct NaturalComparator<K: ?Sized>(PhantomData<fn(&K)>);

impl<K: ?Sized> Default for NaturalComparator<K> {
    fn default() -> Self {
        NaturalComparator(PhantomData)
    }
}

impl<K: Ord + ?Sized> Comparator<K> for NaturalComparator<K> {
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }

    fn name(&self) -> &str {
        "NaturalComparator"
    }
}

/// Inverts another comparator, so the list keeps keys in descending order.
#[derive(Default)]
pub struct ReverseComparator<C>(pub C);

impl<K: ?Sized, C: Comparator<K>> Comparator<K> for ReverseComparator<C> {
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self.0.compare(b, a)
    }

    fn name(&self) -> &str {
        "ReverseComparator"
    }
}

/// `BytewiseComparator` uses lexicographic byte-wise ordering.
#[derive(Default)]
pub struct BytewiseComparator {}

impl<K: AsRef<[u8]> + ?Sized> Comparator<K> for BytewiseComparator {
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.as_ref().cmp(b.as_ref())
    }

    fn name(&self) -> &str {
        "BytewiseComparator"
    }
}

/// Adapts a plain `Fn(&K, &K) -> Ordering` closure.
pub struct FnComparator<F> {
    f: F,
    name: &'static str,
}

impl<F> FnComparator<F> {
    pub fn new(name: &'static str, f: F) -> Self {
        FnComparator { f, name }
    }
}

impl<K: ?Sized, F> Comparator<K> for FnComparator<F>
where
    F: Fn(&K, &K) -> Ordering,
{
    fn compare(&self, a: &K, b: &K) -> Ordering {
        (self.f)(a, b)
    }

    fn name(&self) -> &str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytewise_comparator() {
        let mut tests = vec![
            ("", "1111", Ordering::Less),
            ("1111", "", Ordering::Greater),
            ("1111", "111", Ordering::Greater),
            ("123", "1234", Ordering::Less),
            ("1234", "1234", Ordering::Equal),
            ("1357", "2", Ordering::Less),
        ];
        let c = BytewiseComparator::default();
        for (a, b, expect) in tests.drain(..) {
            assert_eq!(Comparator::<str>::compare(&c, a, b), expect, "{} {}", a, b);
        }
        let a: Vec<u8> = vec![48, 255];
        let b: Vec<u8> = vec![48, 49, 50, 51];
        assert_eq!(c.compare(&a, &b), Ordering::Greater);
    }

    #[test]
    fn test_reverse_and_fn_comparator() {
        let rev = ReverseComparator(NaturalComparator::<i32>::default());
        assert_eq!(rev.compare(&1, &2), Ordering::Greater);
        assert_eq!(rev.compare(&2, &2), Ordering::Equal);
        assert_eq!(rev.name(), "ReverseComparator");

        let by_len = FnComparator::new("ByLen", |a: &String, b: &String| a.len().cmp(&b.len()));
        assert_eq!(by_len.compare(&"aa".to_owned(), &"b".to_owned()), Ordering::Greater);
        assert_eq!(Comparator::<String>::name(&by_len), "ByLen");
    }
}
