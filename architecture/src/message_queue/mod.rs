//! Message queue abstractions.
crate::make_re_export!(consumer, producer);
