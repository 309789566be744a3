//! Byte-level book side snapshots for tests.
//!
//! Builds account buffers the way the on-chain program lays them out:
//! slots come from the bump allocator, orders form a real crit-bit tree,
//! and retired slots are threaded into a free list.

#![allow(dead_code)]

use perp_book_slab::layout::{account_len, header, Field, NODES_OFFSET, NODE_LEN};
use perp_book_slab::types::DataType;

pub const TAG_UNINITIALIZED: u32 = 0;
pub const TAG_INNER: u32 = 1;
pub const TAG_LEAF: u32 = 2;
pub const TAG_FREE: u32 = 3;
pub const TAG_LAST_FREE: u32 = 4;

/// Header values written into the snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderFields {
    pub bump_index: u64,
    pub free_list_len: u64,
    pub free_list_head: u32,
    pub root_node: u32,
    pub leaf_count: u64,
}

/// Builder for a raw book side account.
pub struct SnapshotBuilder {
    data_type: DataType,
    header: HeaderFields,
    records: Vec<[u8; NODE_LEN]>,
    next_seq: u64,
}

impl SnapshotBuilder {
    pub fn new(data_type: DataType, capacity: usize) -> Self {
        Self {
            data_type,
            header: HeaderFields::default(),
            records: vec![[0u8; NODE_LEN]; capacity],
            next_seq: 0,
        }
    }

    pub fn header_mut(&mut self) -> &mut HeaderFields {
        &mut self.header
    }

    /// Take the next never-used slot.
    pub fn alloc(&mut self) -> u32 {
        let handle = self.header.bump_index as u32;
        self.header.bump_index += 1;
        handle
    }

    /// Key for an order at `price`, later calls getting later sequence numbers.
    pub fn next_key(&mut self, price: i64) -> u128 {
        let seq = self.next_seq;
        self.next_seq += 1;
        let seq_bits = match self.data_type {
            DataType::Bids => !seq,
            _ => seq,
        };
        ((price as u64 as u128) << 64) | seq_bits as u128
    }

    pub fn write_leaf(&mut self, slot: u32, key: u128, quantity: i64) {
        let seq = key as u64;
        let rec = &mut self.records[slot as usize];
        *rec = [0u8; NODE_LEN];
        rec[0..4].copy_from_slice(&TAG_LEAF.to_le_bytes());
        rec[4] = seq as u8;
        rec[6] = 1;
        rec[8..24].copy_from_slice(&key.to_le_bytes());
        rec[24..56].copy_from_slice(&[seq as u8; 32]);
        rec[56..64].copy_from_slice(&quantity.to_le_bytes());
        rec[64..72].copy_from_slice(&seq.to_le_bytes());
        rec[80..88].copy_from_slice(&(1_650_000_000 + slot as u64).to_le_bytes());
    }

    pub fn write_inner(&mut self, slot: u32, prefix_len: u32, key: u128, children: [u32; 2]) {
        let rec = &mut self.records[slot as usize];
        *rec = [0u8; NODE_LEN];
        rec[0..4].copy_from_slice(&TAG_INNER.to_le_bytes());
        rec[4..8].copy_from_slice(&prefix_len.to_le_bytes());
        rec[8..24].copy_from_slice(&key.to_le_bytes());
        rec[24..28].copy_from_slice(&children[0].to_le_bytes());
        rec[28..32].copy_from_slice(&children[1].to_le_bytes());
    }

    /// Overwrite only the tag of a slot.
    pub fn raw_tag(&mut self, slot: usize, tag: u32) {
        self.records[slot][0..4].copy_from_slice(&tag.to_le_bytes());
    }

    /// Leaf slots with no tree over them, in the given slot order.
    pub fn loose_leaves(&mut self, orders: &[(i64, i64)]) -> Vec<u32> {
        orders
            .iter()
            .map(|&(price, quantity)| {
                let key = self.next_key(price);
                let slot = self.alloc();
                self.write_leaf(slot, key, quantity);
                slot
            })
            .collect()
    }

    /// Build a crit-bit tree over `(price, quantity)` orders.
    ///
    /// Sequence numbers follow slice order. Returns the root handle.
    pub fn tree(&mut self, orders: &[(i64, i64)]) -> u32 {
        let mut keyed: Vec<(u128, i64)> = orders
            .iter()
            .map(|&(price, quantity)| (self.next_key(price), quantity))
            .collect();
        keyed.sort_by_key(|&(key, _)| key);
        if keyed.is_empty() {
            return self.header.root_node;
        }

        let root = self.subtree(&keyed);
        self.header.root_node = root;
        self.header.leaf_count = keyed.len() as u64;
        root
    }

    pub fn asks_tree(&mut self, orders: &[(i64, i64)]) -> u32 {
        assert_eq!(self.data_type, DataType::Asks);
        self.tree(orders)
    }

    pub fn bids_tree(&mut self, orders: &[(i64, i64)]) -> u32 {
        assert_eq!(self.data_type, DataType::Bids);
        self.tree(orders)
    }

    fn subtree(&mut self, sorted: &[(u128, i64)]) -> u32 {
        if let [(key, quantity)] = sorted {
            let slot = self.alloc();
            self.write_leaf(slot, *key, *quantity);
            return slot;
        }

        let first = sorted[0].0;
        let last = sorted[sorted.len() - 1].0;
        let prefix_len = (first ^ last).leading_zeros();
        let crit_bit = 1u128 << (127 - prefix_len);
        let split = sorted
            .iter()
            .position(|(key, _)| key & crit_bit != 0)
            .expect("distinct keys differ at the crit bit");

        let slot = self.alloc();
        let left = self.subtree(&sorted[..split]);
        let right = self.subtree(&sorted[split..]);
        self.write_inner(slot, prefix_len, first, [left, right]);
        slot
    }

    /// Thread `slots` into the free list, head first.
    pub fn free_slots(&mut self, slots: &[u32]) {
        for (i, &slot) in slots.iter().enumerate() {
            let (tag, next) = match slots.get(i + 1) {
                Some(&next) => (TAG_FREE, next),
                None => (TAG_LAST_FREE, 0),
            };
            let rec = &mut self.records[slot as usize];
            rec[0..4].copy_from_slice(&tag.to_le_bytes());
            rec[4..8].copy_from_slice(&next.to_le_bytes());
        }

        if let Some(&head) = slots.first() {
            self.header.free_list_head = head;
        }
        self.header.free_list_len = slots.len() as u64;
        if let Some(&max) = slots.iter().max() {
            self.header.bump_index = self.header.bump_index.max(max as u64 + 1);
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let len = account_len(self.records.len()).expect("test capacity fits a u32 handle");
        let mut buf = vec![0u8; len];

        buf[0] = self.data_type.to_u8();
        buf[1] = 1;
        buf[2] = 1;

        put(&mut buf, header::BUMP_INDEX, &self.header.bump_index.to_le_bytes());
        put(&mut buf, header::FREE_LIST_LEN, &self.header.free_list_len.to_le_bytes());
        put(&mut buf, header::FREE_LIST_HEAD, &self.header.free_list_head.to_le_bytes());
        put(&mut buf, header::ROOT_NODE, &self.header.root_node.to_le_bytes());
        put(&mut buf, header::LEAF_COUNT, &self.header.leaf_count.to_le_bytes());

        for (i, rec) in self.records.iter().enumerate() {
            let start = NODES_OFFSET + i * NODE_LEN;
            buf[start..start + NODE_LEN].copy_from_slice(rec);
        }
        buf
    }
}

fn put(buf: &mut [u8], field: Field, bytes: &[u8]) {
    assert_eq!(field.width, bytes.len(), "width mismatch for {}", field.name);
    buf[field.offset..field.end()].copy_from_slice(bytes);
}
