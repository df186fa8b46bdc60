#![no_main]

use dotinspect::prelude::*;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let dispenser = FileDispenser::with_options(OpenOptions::lenient());
    let Ok(scope) = dispenser.open_bytes(data.to_vec()) else {
        return;
    };

    let _ = extract(&scope);
    for kind in [
        EnumKind::References,
        EnumKind::Files,
        EnumKind::ExportedTypes,
        EnumKind::Resources,
    ] {
        if let Ok(tokens) = scope.enumerate(kind) {
            for token in tokens.flatten() {
                let _ = match kind {
                    EnumKind::References => scope.get_assembly_ref_properties(token).map(drop),
                    EnumKind::Files => scope.get_file_properties(token).map(drop),
                    EnumKind::ExportedTypes => scope.get_exported_type_properties(token).map(drop),
                    EnumKind::Resources => scope.get_manifest_resource_properties(token).map(drop),
                };
            }
        }
    }
    scope.close();
});
