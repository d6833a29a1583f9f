#![doc = r#"
Parse Standard MIDI Files into timed notes.

`midi-timeline` reads an in-memory SMF buffer, decodes every track, builds the
file's tempo map and converts ticks into seconds so that each note carries an
absolute start and end time.

# Example
```rust
# use midi_timeline::prelude::*;
# fn load() -> &'static [u8] { &[] }
let bytes = load();
match ParsedMidi::parse(bytes) {
    Ok(parsed) => {
        for instrument in parsed.instruments() {
            println!("program {} has {} notes", instrument.program(), instrument.notes().len());
        }
    }
    Err(e) => eprintln!("{e}"),
}
```

# Layout

```text
bytes -> reader -> file (chunks) -> events (per track)
                                      |
                          tempo (map + converter)
                                      |
                          instrument (note assembly)
```
"#]
#![warn(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod reader;

pub mod file;

pub mod events;

pub mod tempo;

pub mod instrument;

mod diagnostics;
pub use diagnostics::*;

mod parser;
pub use parser::*;

pub use reader::{ReadResult, ReaderError, ReaderErrorKind};

/// Commonly used types
pub mod prelude {
    pub use crate::{
        diagnostics::*,
        events::*,
        file::{meta::*, *},
        instrument::*,
        parser::*,
        reader::{ReadResult, Reader, ReaderError, ReaderErrorKind},
        tempo::*,
    };
}
