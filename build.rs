// SPDX-License-Identifier: MIT OR Apache-2.0
//! The only thing this build script does is make Windows builds carry the Visual C
//! runtime statically, so the tool runs on machines that only have the vendor IDE
//! installed. On every other platform it is a no-op.

fn main()
{
    // Statically link the Visual C runtime on Windows.
    static_vcruntime::metabuild();
}
