//! `serde` support for [`QuaternaryTree`]s
//!
//! A tree is written as its preorder key sequence and read back by inserting that sequence in
//! order. Trees built purely by insertion come back with the same shape; after removals the
//! reloaded shape is the one those keys produce when inserted fresh.

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::{Serialize, Serializer};

use std::fmt;
use std::marker::PhantomData;

use crate::{Key, QuaternaryTree};

impl<K: Serialize> Serialize for QuaternaryTree<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.preorder())
    }
}

impl<'de, K> Deserialize<'de> for QuaternaryTree<K>
where
    K: Deserialize<'de> + Key,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(QuaternaryTreeVisitor {
            marker: PhantomData,
        })
    }
}

struct QuaternaryTreeVisitor<K> {
    marker: PhantomData<QuaternaryTree<K>>,
}

impl<'de, K> Visitor<'de> for QuaternaryTreeVisitor<K>
where
    K: Deserialize<'de> + Key,
{
    type Value = QuaternaryTree<K>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a sequence of keys in preorder")
    }

    fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut tree = QuaternaryTree::new();
        while let Some(key) = seq.next_element()? {
            tree.insert(key);
        }

        Ok(tree)
    }
}
