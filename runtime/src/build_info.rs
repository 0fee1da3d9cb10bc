// Build Metadata
//
// Compile-time identity of the runtime, printed once at bring-up so serial
// logs can be matched to a build.

macro_rules! define_build_meta {
    ($runtime_name:literal, $phase_label:literal) => {
        pub const RUNTIME_NAME: &str = $runtime_name;
        pub const VERSION: &str = env!("CARGO_PKG_VERSION");
        pub const PHASE_LABEL: &str = $phase_label;

        pub const BOOT_BANNER: &str = concat!(
            $runtime_name,
            " v",
            env!("CARGO_PKG_VERSION"),
            " - ",
            $phase_label
        );
    };
}

define_build_meta!("Rustic Runtime", "Bring-up Heap");
