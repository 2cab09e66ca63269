/// Constructors and standard trait impls shared by the tree maps.
///
/// The map type must have the fields `root`, `num_nodes`, `comparator` and
/// `_owns`, and implement [`OrderedMap`](crate::OrderedMap) with tag `$tag`.
macro_rules! tree_map_common {
    ($map:ident, $tag:ty) => {
        impl<K: Ord, V> $map<K, V> {
            /// Creates an empty map ordered by `K: Ord`.
            /// No memory is allocated until the first item is inserted.
            pub fn new() -> Self {
                Self::with_comparator(::compare::natural())
            }

            /// Creates a map with keys from `keys`, all mapped to `value`.
            pub fn fromkeys<I>(keys: I, value: V) -> Self
            where
                I: IntoIterator<Item = K>,
                V: Clone,
            {
                let mut map = Self::new();
                for key in keys {
                    $crate::OrderedMap::insert(&mut map, key, value.clone());
                }
                map
            }
        }

        impl<K, V, C: ::compare::Compare<K>> $map<K, V, C> {
            /// Creates an empty map ordered by `comparator`.
            pub fn with_comparator(comparator: C) -> Self {
                Self {
                    root: None,
                    num_nodes: 0,
                    comparator,
                    _owns: ::std::marker::PhantomData,
                }
            }
        }

        impl<K, V, C> Drop for $map<K, V, C> {
            fn drop(&mut self) {
                unsafe { $crate::node::destroy_all(self.root.take()) };
            }
        }

        impl<K: Ord, V> Default for $map<K, V> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<K, V, C> Clone for $map<K, V, C>
        where
            K: Clone,
            V: Clone,
            C: ::compare::Compare<K> + Clone,
        {
            fn clone(&self) -> Self {
                let mut map = Self::with_comparator(self.comparator.clone());
                map.extend(
                    $crate::OrderedMap::iter(self).map(|(key, value)| (key.clone(), value.clone())),
                );
                map
            }
        }

        impl<K, V, C> PartialEq for $map<K, V, C>
        where
            K: PartialEq,
            V: PartialEq,
            C: ::compare::Compare<K>,
        {
            fn eq(&self, other: &Self) -> bool {
                self.num_nodes == other.num_nodes
                    && $crate::OrderedMap::iter(self).eq($crate::OrderedMap::iter(other))
            }
        }

        impl<K: Eq, V: Eq, C: ::compare::Compare<K>> Eq for $map<K, V, C> {}

        impl<K, V, C> ::std::fmt::Debug for $map<K, V, C>
        where
            K: ::std::fmt::Debug,
            V: ::std::fmt::Debug,
            C: ::compare::Compare<K>,
        {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                f.debug_map().entries($crate::OrderedMap::iter(self)).finish()
            }
        }

        impl<K: Ord, V> ::std::iter::FromIterator<(K, V)> for $map<K, V> {
            fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
                let mut map = Self::new();
                map.extend(iter);
                map
            }
        }

        impl<K, V, C: ::compare::Compare<K>> Extend<(K, V)> for $map<K, V, C> {
            fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
                for (key, value) in iter {
                    $crate::OrderedMap::insert(self, key, value);
                }
            }
        }

        impl<'a, K, V, C: ::compare::Compare<K>> IntoIterator for &'a $map<K, V, C> {
            type Item = (&'a K, &'a V);
            type IntoIter = $crate::Iter<'a, K, V, $tag, C>;
            fn into_iter(self) -> Self::IntoIter {
                $crate::OrderedMap::iter(self)
            }
        }

        // The map owns its nodes exclusively, like a `Box` tree would.
        unsafe impl<K: Send, V: Send, C: Send> Send for $map<K, V, C> {}
        unsafe impl<K: Sync, V: Sync, C: Sync> Sync for $map<K, V, C> {}
    };
}
