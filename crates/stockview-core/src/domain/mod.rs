//! # Domain Models
//!
//! Records fetched from the stocks backend and the decorated form the view
//! state works with.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Instrument`] | Stock metadata (`/stocks`) |
//! | [`InstrumentId`] | Unique instrument identity |
//! | [`SelectableInstrument`] | Instrument plus its checkbox state |
//! | [`ValueRecord`] | Dated value observation (`/stockvalues`) |
//! | [`ValueDate`] | Observation date, kept verbatim with its parsed instant |
//!
//! Wire field names follow the backend: the instrument display name travels
//! as `stock`, and value records reference instruments through `stock_id`.

mod instrument;
mod value_date;
mod value_record;

pub use instrument::{Instrument, InstrumentId, SelectableInstrument};
pub use value_date::ValueDate;
pub use value_record::ValueRecord;
