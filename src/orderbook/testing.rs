//! Account builder for unit tests.
//!
//! Writes every field through the [`layout`](crate::layout) schema, so a
//! builder bug and a decoder bug cannot cancel out on a hand-picked offset.

use crate::layout::{self, header, node, Field, NODES_OFFSET, NODE_LEN};
use crate::orderbook::SlabHeader;
use crate::types::{DataType, MetaData, NodeHandle, NodeKind};

pub(crate) struct BookBuilder {
    header: SlabHeader,
    capacity: usize,
    arena: Vec<u8>,
    next_seq: u64,
}

fn put(buf: &mut [u8], field: Field, bytes: &[u8]) {
    assert_eq!(field.width, bytes.len(), "{} written with wrong width", field.name);
    buf[field.offset..field.end()].copy_from_slice(bytes);
}

impl BookBuilder {
    pub fn new(data_type: DataType, capacity: usize) -> Self {
        Self {
            header: SlabHeader {
                metadata: MetaData {
                    data_type,
                    version: 1,
                    is_initialized: true,
                    extra_info: [0; 5],
                },
                bump_index: 0,
                free_list_len: 0,
                free_list_head: 0,
                root_node: 0,
                leaf_count: 0,
            },
            capacity,
            arena: vec![0; capacity * NODE_LEN],
            next_seq: 0,
        }
    }

    pub fn header_mut(&mut self) -> &mut SlabHeader {
        &mut self.header
    }

    pub fn alloc(&mut self) -> NodeHandle {
        let handle = self.header.bump_index as NodeHandle;
        self.header.bump_index += 1;
        handle
    }

    /// Key at `price` with the next sequence number, inverted on bids.
    pub fn next_key(&mut self, price: i64) -> u128 {
        let seq = self.next_seq;
        self.next_seq += 1;
        let low = match self.header.metadata.data_type {
            DataType::Bids => !seq,
            _ => seq,
        };
        ((price as u64 as u128) << 64) | low as u128
    }

    fn record(&mut self, slot: NodeHandle, kind: NodeKind) -> &mut [u8] {
        let start = slot as usize * NODE_LEN;
        let record = &mut self.arena[start..start + NODE_LEN];
        record.fill(0);
        put(record, node::TAG, &kind.to_u32().to_le_bytes());
        record
    }

    pub fn write_leaf(&mut self, slot: NodeHandle, key: u128, quantity: i64) {
        let seq = key as u64;
        let record = self.record(slot, NodeKind::Leaf);
        put(record, node::LEAF_OWNER_SLOT, &[seq as u8]);
        put(record, node::LEAF_VERSION, &[1]);
        put(record, node::LEAF_KEY, &key.to_le_bytes());
        put(record, node::LEAF_OWNER, &[seq as u8; 32]);
        put(record, node::LEAF_QUANTITY, &quantity.to_le_bytes());
        put(record, node::LEAF_CLIENT_ORDER_ID, &seq.to_le_bytes());
        put(record, node::LEAF_TIMESTAMP, &(1_650_000_000 + slot as u64).to_le_bytes());
    }

    pub fn write_inner(
        &mut self,
        slot: NodeHandle,
        prefix_len: u32,
        key: u128,
        children: [NodeHandle; 2],
    ) {
        let record = self.record(slot, NodeKind::Inner);
        put(record, node::INNER_PREFIX_LEN, &prefix_len.to_le_bytes());
        put(record, node::INNER_KEY, &key.to_le_bytes());
        put(record, node::INNER_CHILD_0, &children[0].to_le_bytes());
        put(record, node::INNER_CHILD_1, &children[1].to_le_bytes());
    }

    /// Overwrite the tag of `slot`, leaving the body alone.
    pub fn raw_tag(&mut self, slot: usize, tag: u32) {
        let start = slot * NODE_LEN;
        put(&mut self.arena[start..start + NODE_LEN], node::TAG, &tag.to_le_bytes());
    }

    /// Leaves in consecutive slots with no tree over them.
    pub fn loose_leaves(&mut self, orders: &[(i64, i64)]) -> Vec<NodeHandle> {
        let mut slots = Vec::with_capacity(orders.len());
        for &(price, quantity) in orders {
            let key = self.next_key(price);
            let slot = self.alloc();
            self.write_leaf(slot, key, quantity);
            slots.push(slot);
        }
        slots
    }

    pub fn asks_tree(&mut self, orders: &[(i64, i64)]) -> NodeHandle {
        assert_eq!(self.header.metadata.data_type, DataType::Asks);
        self.tree(orders)
    }

    pub fn bids_tree(&mut self, orders: &[(i64, i64)]) -> NodeHandle {
        assert_eq!(self.header.metadata.data_type, DataType::Bids);
        self.tree(orders)
    }

    fn tree(&mut self, orders: &[(i64, i64)]) -> NodeHandle {
        let mut keyed: Vec<(u128, i64)> = orders
            .iter()
            .map(|&(price, quantity)| (self.next_key(price), quantity))
            .collect();
        if keyed.is_empty() {
            return self.header.root_node;
        }
        keyed.sort_unstable_by_key(|&(key, _)| key);

        self.header.root_node = self.branch(&keyed);
        self.header.leaf_count = keyed.len() as u64;
        self.header.root_node
    }

    /// Inner node over `sorted`, split at the first differing key bit.
    fn branch(&mut self, sorted: &[(u128, i64)]) -> NodeHandle {
        if let [(key, quantity)] = *sorted {
            let slot = self.alloc();
            self.write_leaf(slot, key, quantity);
            return slot;
        }

        let low = sorted[0].0;
        let prefix_len = (low ^ sorted[sorted.len() - 1].0).leading_zeros();
        let bit = 1u128 << (127 - prefix_len);
        let split = sorted.partition_point(|&(key, _)| key & bit == 0);

        let slot = self.alloc();
        let left = self.branch(&sorted[..split]);
        let right = self.branch(&sorted[split..]);
        self.write_inner(slot, prefix_len, low, [left, right]);
        slot
    }

    /// Chain `slots` into the free list, `slots[0]` at the head.
    pub fn free_slots(&mut self, slots: &[NodeHandle]) {
        for (i, &slot) in slots.iter().enumerate() {
            let (kind, next) = match slots.get(i + 1) {
                Some(&next) => (NodeKind::Free, next),
                None => (NodeKind::LastFree, 0),
            };
            let record = self.record(slot, kind);
            put(record, node::FREE_NEXT, &next.to_le_bytes());
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
        let len = layout::account_len(self.capacity).expect("test capacity is addressable");
        let mut buf = vec![0; len];

        let meta = &self.header.metadata;
        let block = &mut buf[..header::METADATA.width];
        put(block, layout::metadata::DATA_TYPE, &[meta.data_type.to_u8()]);
        put(block, layout::metadata::VERSION, &[meta.version]);
        put(block, layout::metadata::IS_INITIALIZED, &[meta.is_initialized as u8]);
        put(block, layout::metadata::EXTRA_INFO, &meta.extra_info);

        put(&mut buf, header::BUMP_INDEX, &self.header.bump_index.to_le_bytes());
        put(&mut buf, header::FREE_LIST_LEN, &self.header.free_list_len.to_le_bytes());
        put(&mut buf, header::FREE_LIST_HEAD, &self.header.free_list_head.to_le_bytes());
        put(&mut buf, header::ROOT_NODE, &self.header.root_node.to_le_bytes());
        put(&mut buf, header::LEAF_COUNT, &self.header.leaf_count.to_le_bytes());

        buf[NODES_OFFSET..].copy_from_slice(&self.arena);
        buf
    }
}
