use std::cmp::Ordering;
use std::env;
use std::process::Command;

// Target capabilities that select a native backend in this crate
#[derive(PartialEq, Eq, Debug)]
struct CpuFeature {
    name: &'static str,
    target_feature: &'static str,
    cfg_flag: &'static str,
    detected: bool,
}

impl CpuFeature {
    // Lowest number == applied first; every detected feature is applied
    fn priority(&self) -> usize {
        match self.name {
            "neon" => 0,
            "aes" => 1,
            "crc32" => 2,
            _ => usize::MAX,
        }
    }

    fn features() -> Vec<CpuFeature> {
        vec![
            CpuFeature {
                name: "aes",
                target_feature: "aes",
                cfg_flag: "neon_aes",
                detected: false,
            },
            CpuFeature {
                name: "neon",
                target_feature: "neon",
                cfg_flag: "neon",
                detected: false,
            },
            CpuFeature {
                name: "crc32",
                target_feature: "crc",
                cfg_flag: "neon_crc",
                detected: false,
            },
        ]
    }
}

impl Ord for CpuFeature {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority().cmp(&other.priority())
    }
}

impl PartialOrd for CpuFeature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

trait CpuFeatureDetector {
    fn detect_features(&self, features: &mut [CpuFeature]);
    fn is_applicable(&self) -> bool;
}

// Features the compiler was told to assume (`-C target-feature`, target defaults)
struct TargetFeatureDetector;
impl CpuFeatureDetector for TargetFeatureDetector {
    fn detect_features(&self, features: &mut [CpuFeature]) {
        let enabled = env::var("CARGO_CFG_TARGET_FEATURE").unwrap_or_default();
        let enabled: Vec<&str> = enabled.split(',').collect();
        for feature in features.iter_mut() {
            feature.detected |= enabled.contains(&feature.target_feature);
        }
    }

    fn is_applicable(&self) -> bool {
        true
    }
}

// Linux CPU feature detector, native builds only
struct LinuxDetector;
impl CpuFeatureDetector for LinuxDetector {
    fn detect_features(&self, features: &mut [CpuFeature]) {
        if let Ok(cpuinfo) = std::fs::read_to_string("/proc/cpuinfo") {
            let contents = cpuinfo.to_lowercase();
            let flags: Vec<&str> = contents
                .lines()
                .filter(|line| line.starts_with("features"))
                .flat_map(|line| line.split_whitespace())
                .collect();
            for feature in features.iter_mut() {
                // aarch64 reports "asimd" for NEON
                let present = match feature.name {
                    "neon" => flags.contains(&"asimd"),
                    name => flags.contains(&name),
                };
                feature.detected |= present;
            }
        }
    }

    fn is_applicable(&self) -> bool {
        cfg!(target_os = "linux")
    }
}

// macOS CPU feature detector, native builds only
struct MacOSDetector;
impl CpuFeatureDetector for MacOSDetector {
    fn detect_features(&self, features: &mut [CpuFeature]) {
        let output = Command::new("sysctl").args(["-a"]).output();

        if let Ok(output) = output {
            let contents = String::from_utf8_lossy(&output.stdout).to_lowercase();

            for feature in features.iter_mut() {
                match feature.name {
                    "neon" => feature.detected |= contents.contains("hw.optional.neon: 1"),
                    "aes" => {
                        feature.detected |= contents.contains("hw.optional.arm.feat_aes: 1")
                    }
                    "crc32" => {
                        feature.detected |= contents.contains("hw.optional.armv8_crc32: 1")
                    }
                    _ => {}
                }
            }
        }
    }

    fn is_applicable(&self) -> bool {
        cfg!(target_os = "macos")
    }
}

struct PlatformDetector;
impl PlatformDetector {
    fn cpu_features_detectors() -> Vec<Box<dyn CpuFeatureDetector>> {
        vec![Box::new(LinuxDetector), Box::new(MacOSDetector)]
    }

    fn detect_cpu_features(features: &mut [CpuFeature]) {
        for detector in Self::cpu_features_detectors() {
            if detector.is_applicable() {
                detector.detect_features(features);
                break;
            }
        }
    }

    fn apply(features: &mut [CpuFeature], target_is_aarch64: bool, forced_portable: bool) {
        features.sort();

        println!("cargo::rustc-check-cfg=cfg(neon)");
        println!("cargo::rustc-check-cfg=cfg(neon_aes)");
        println!("cargo::rustc-check-cfg=cfg(neon_crc)");
        println!("cargo::rustc-check-cfg=cfg(fallback)");

        // The crypto and crc backends are built on top of the neon one
        let neon = target_is_aarch64
            && !forced_portable
            && features.iter().any(|f| f.name == "neon" && f.detected);

        let applied: Vec<&str> = if neon {
            features
                .iter()
                .filter(|cpu_feature| cpu_feature.detected)
                .map(|cpu_feature| cpu_feature.cfg_flag)
                .collect()
        } else {
            vec!["fallback"]
        };

        for cfg_flag in &applied {
            println!("cargo:rustc-cfg={cfg_flag}");
        }

        println!("cargo:warning=sselane backend: {}", applied.join(", "));
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=CARGO_FEATURE_FORCE_PORTABLE");

    let mut features = CpuFeature::features();

    let target_arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    let target_is_aarch64 = target_arch == "aarch64";
    let forced_portable = env::var_os("CARGO_FEATURE_FORCE_PORTABLE").is_some();

    TargetFeatureDetector.detect_features(&mut features);

    // Only look at the build machine when it is also the machine we run on
    let host = env::var("HOST").unwrap_or_default();
    let target = env::var("TARGET").unwrap_or_default();
    if host == target {
        PlatformDetector::detect_cpu_features(&mut features);
    }

    PlatformDetector::apply(&mut features, target_is_aarch64, forced_portable);
}
