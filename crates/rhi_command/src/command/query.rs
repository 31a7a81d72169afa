//! Asynchronous query commands

use crate::buffer::CommandBuffer;
use crate::command::{Command, DispatchIndex};
use crate::types::{QueryControlFlags, QueryPoolHandle};

/// Reset a range of queries inside a pool before reuse.
#[derive(Debug, Clone, Copy)]
pub struct ResetQueryPool {
    /// Pool whose queries are reset.
    pub query_pool: QueryPoolHandle,
    /// Index of the first query to reset.
    pub first_query_index: u32,
    /// Number of consecutive queries to reset.
    pub number_of_queries: u32,
}

impl ResetQueryPool {
    /// Record the reset.
    pub fn create(
        command_buffer: &mut CommandBuffer,
        query_pool: QueryPoolHandle,
        first_query_index: u32,
        number_of_queries: u32,
    ) {
        debug_assert!(number_of_queries > 0, "at least one query is required");
        command_buffer.add_command(Self {
            query_pool,
            first_query_index,
            number_of_queries,
        });
    }
}

impl Command for ResetQueryPool {
    const DISPATCH_INDEX: DispatchIndex = DispatchIndex::ResetQueryPool;
}

/// Begin a query; must be paired with an [`EndQuery`] on the same index.
#[derive(Debug, Clone, Copy)]
pub struct BeginQuery {
    /// Pool the query lives in.
    pub query_pool: QueryPoolHandle,
    /// Index of the query inside the pool.
    pub query_index: u32,
    /// Behavior flags.
    pub query_control_flags: QueryControlFlags,
}

impl BeginQuery {
    /// Record the query begin.
    pub fn create(
        command_buffer: &mut CommandBuffer,
        query_pool: QueryPoolHandle,
        query_index: u32,
        query_control_flags: QueryControlFlags,
    ) {
        command_buffer.add_command(Self {
            query_pool,
            query_index,
            query_control_flags,
        });
    }
}

impl Command for BeginQuery {
    const DISPATCH_INDEX: DispatchIndex = DispatchIndex::BeginQuery;
}

/// End a query begun with [`BeginQuery`].
#[derive(Debug, Clone, Copy)]
pub struct EndQuery {
    /// Pool the query lives in.
    pub query_pool: QueryPoolHandle,
    /// Index of the query inside the pool.
    pub query_index: u32,
}

impl EndQuery {
    /// Record the query end.
    pub fn create(command_buffer: &mut CommandBuffer, query_pool: QueryPoolHandle, query_index: u32) {
        command_buffer.add_command(Self {
            query_pool,
            query_index,
        });
    }
}

impl Command for EndQuery {
    const DISPATCH_INDEX: DispatchIndex = DispatchIndex::EndQuery;
}

/// Write a GPU timestamp into a query slot.
#[derive(Debug, Clone, Copy)]
pub struct WriteTimestampQuery {
    /// Pool the query lives in.
    pub query_pool: QueryPoolHandle,
    /// Index of the query inside the pool.
    pub query_index: u32,
}

impl WriteTimestampQuery {
    /// Record the timestamp write.
    pub fn create(command_buffer: &mut CommandBuffer, query_pool: QueryPoolHandle, query_index: u32) {
        command_buffer.add_command(Self {
            query_pool,
            query_index,
        });
    }
}

impl Command for WriteTimestampQuery {
    const DISPATCH_INDEX: DispatchIndex = DispatchIndex::WriteTimestampQuery;
}
