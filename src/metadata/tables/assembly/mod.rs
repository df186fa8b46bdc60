//! The `Assembly` table (0x20): the single identity record of an assembly's manifest module.

mod raw;
mod reader;

pub use raw::*;

use bitflags::bitflags;

bitflags! {
    /// `AssemblyFlags` (ECMA-335 II.23.1.2). Unknown bits are retained.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AssemblyFlags: u32 {
        /// The public key column holds the full key, not a token
        const PUBLIC_KEY = 0x0001;
        /// The referenced assembly may be retargeted at runtime
        const RETARGETABLE = 0x0100;
        /// Processor architecture was explicitly specified
        const PA_SPECIFIED = 0x0080;
        /// Content type: Windows Runtime
        const CONTENT_TYPE_WINDOWS_RUNTIME = 0x0200;
        /// JIT optimizer disabled
        const DISABLE_JIT_COMPILE_OPTIMIZER = 0x4000;
        /// JIT tracking enabled
        const ENABLE_JIT_COMPILE_TRACKING = 0x8000;
    }
}

impl AssemblyFlags {
    const PA_MASK: u32 = 0x0070;

    /// The processor architecture field: 0 none, 1 MSIL, 2 x86, 3 IA64, 4 AMD64, 5 ARM.
    #[must_use]
    pub fn processor_architecture(&self) -> u32 {
        (self.bits() & Self::PA_MASK) >> 4
    }
}
