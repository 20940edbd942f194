//! Device fingerprinting for license binding.
//!
//! Generates a stable hardware fingerprint that identifies this machine.
//! The backend records it next to the license key so a key can be tied
//! to the device it was activated on.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use sysinfo::{CpuRefreshKind, Networks, RefreshKind, System};

/// Interface name prefixes whose addresses are assigned in software.
const VIRTUAL_INTERFACE_PREFIXES: &[&str] = &[
    "lo", "docker", "br-", "veth", "virbr", "vmnet", "vboxnet", "bond", "tun", "tap", "utun",
    "awdl", "llw", "bridge", "ifb", "dummy", "wg", "zt", "cni", "flannel",
];

/// Machine attributes that feed the fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceAttributes {
    /// OS descriptor: `<os>-<version>-<arch>`.
    pub platform: String,
    /// CPU descriptor.
    pub processor: String,
    /// Machine architecture.
    pub machine: String,
    /// Host name.
    pub node: String,
    /// Primary hardware address as `aa:bb:cc:dd:ee:ff`, when one can be read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
}

impl DeviceAttributes {
    /// Collects attributes of the current machine.
    ///
    /// Never fails: anything that cannot be read falls back to a fixed
    /// placeholder, and the hardware address is simply left out.
    #[must_use]
    pub fn collect() -> Self {
        Self {
            platform: format!("{}-{}-{}", env::consts::OS, get_os_version(), env::consts::ARCH),
            processor: get_processor().unwrap_or_else(|| env::consts::ARCH.to_string()),
            machine: env::consts::ARCH.to_string(),
            node: get_hostname(),
            mac: mac_address(),
        }
    }

    /// Hashes the attributes into a fingerprint.
    ///
    /// Attributes are written as a JSON object with lexicographically sorted
    /// keys, then SHA-256 hashed.
    #[must_use]
    pub fn fingerprint(&self) -> HardwareFingerprint {
        let mut canonical: BTreeMap<&str, &str> = BTreeMap::new();
        canonical.insert("platform", &self.platform);
        canonical.insert("processor", &self.processor);
        canonical.insert("machine", &self.machine);
        canonical.insert("node", &self.node);
        if let Some(mac) = &self.mac {
            canonical.insert("mac", mac);
        }

        // A map of strings always serializes.
        let encoded = serde_json::to_vec(&canonical).unwrap_or_default();

        let mut hasher = Sha256::new();
        hasher.update(&encoded);
        HardwareFingerprint(hex::encode(hasher.finalize()))
    }
}

/// A stable fingerprint that identifies this device: 64 lowercase hex chars.
///
/// Deserialization rejects anything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HardwareFingerprint(String);

impl HardwareFingerprint {
    /// Length of the hex-encoded SHA-256 digest.
    pub const LEN: usize = 64;

    /// Generates a fingerprint for the current device.
    #[must_use]
    pub fn generate() -> Self {
        DeviceAttributes::collect().fingerprint()
    }

    /// Returns the fingerprint as a hex string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the first `len` hex chars, for logs.
    #[must_use]
    pub fn short(&self, len: usize) -> &str {
        self.0.get(..len).unwrap_or(&self.0)
    }

    /// Validates that this fingerprint matches the current device.
    #[must_use]
    pub fn matches_current(&self) -> bool {
        *self == Self::generate()
    }
}

impl TryFrom<String> for HardwareFingerprint {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let well_formed = value.len() == Self::LEN
            && value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if well_formed {
            Ok(Self(value))
        } else {
            Err(format!(
                "hardware fingerprint must be {} lowercase hex chars",
                Self::LEN
            ))
        }
    }
}

impl From<HardwareFingerprint> for String {
    fn from(fingerprint: HardwareFingerprint) -> Self {
        fingerprint.0
    }
}

impl fmt::Display for HardwareFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Gets the machine hostname.
fn get_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Gets the OS version string.
fn get_os_version() -> String {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("sw_vers")
            .arg("-productVersion")
            .output()
            .ok()
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "unknown".to_string())
    }

    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/etc/os-release")
            .ok()
            .and_then(|content| parse_os_release_version(&content))
            .unwrap_or_else(|| "unknown".to_string())
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        System::os_version().unwrap_or_else(|| "unknown".to_string())
    }
}

/// Extracts `VERSION_ID` from the contents of `/etc/os-release`.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_os_release_version(content: &str) -> Option<String> {
    content
        .lines()
        .find_map(|l| l.strip_prefix("VERSION_ID="))
        .map(|v| v.trim().trim_matches('"').to_string())
        .filter(|v| !v.is_empty())
}

/// Gets the CPU brand string of the first core.
fn get_processor() -> Option<String> {
    let sys =
        System::new_with_specifics(RefreshKind::nothing().with_cpu(CpuRefreshKind::everything()));
    sys.cpus()
        .first()
        .map(|cpu| cpu.brand().trim().to_string())
        .filter(|brand| !brand.is_empty())
}

/// One network interface as seen when picking the hardware address.
#[derive(Debug, Clone)]
struct InterfaceAddr {
    name: String,
    mac: String,
    /// The address is burned into a physical device rather than assigned at runtime.
    permanent: bool,
}

/// Reads the primary hardware address, if the platform exposes one.
fn mac_address() -> Option<String> {
    let networks = Networks::new_with_refreshed_list();
    let candidates = networks
        .iter()
        .map(|(name, data)| InterfaceAddr {
            name: name.clone(),
            mac: data.mac_address().to_string(),
            permanent: has_permanent_address(name),
        })
        .collect();
    select_mac(candidates)
}

/// Picks the address of the first physical interface in name order.
///
/// Virtual interfaces (bridges, container links, tunnels, loopback) are
/// skipped since their addresses change when they are recreated. All-zero
/// and malformed addresses are skipped too.
fn select_mac(mut candidates: Vec<InterfaceAddr>) -> Option<String> {
    candidates.sort_by(|a, b| a.name.cmp(&b.name));
    candidates
        .into_iter()
        .filter(|c| c.permanent && !is_virtual_interface(&c.name))
        .find_map(|c| normalize_mac(&c.mac))
}

fn is_virtual_interface(name: &str) -> bool {
    VIRTUAL_INTERFACE_PREFIXES
        .iter()
        .any(|prefix| name.starts_with(prefix))
}

/// Returns true if the interface is backed by a device and its address is permanent.
#[cfg(target_os = "linux")]
fn has_permanent_address(name: &str) -> bool {
    let base = std::path::Path::new("/sys/class/net").join(name);
    // addr_assign_type 0 = permanent (NET_ADDR_PERM)
    base.join("device").exists()
        && std::fs::read_to_string(base.join("addr_assign_type"))
            .is_ok_and(|t| t.trim() == "0")
}

#[cfg(not(target_os = "linux"))]
fn has_permanent_address(_name: &str) -> bool {
    true
}

/// Normalizes a hardware address to six colon-separated lowercase hex octets.
///
/// Accepts `:` or `-` separators. Returns `None` for anything that is not
/// exactly six octets, and for the all-zero address.
fn normalize_mac(raw: &str) -> Option<String> {
    let octets: Vec<u8> = raw
        .trim()
        .split([':', '-'])
        .map(|part| {
            if part.len() == 2 {
                u8::from_str_radix(part, 16).ok()
            } else {
                None
            }
        })
        .collect::<Option<Vec<u8>>>()?;

    if octets.len() != 6 || octets.iter().all(|&b| b == 0) {
        return None;
    }

    Some(
        octets
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(":"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iface(name: &str, mac: &str, permanent: bool) -> InterfaceAddr {
        InterfaceAddr {
            name: name.to_string(),
            mac: mac.to_string(),
            permanent,
        }
    }

    fn is_lower_hex(s: &str) -> bool {
        s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    #[test]
    fn normalize_mac_lowercases_and_accepts_dashes() {
        assert_eq!(
            normalize_mac("00-1A-2B-3C-4D-5E").as_deref(),
            Some("00:1a:2b:3c:4d:5e")
        );
        assert_eq!(
            normalize_mac("aa:bb:cc:dd:ee:ff\n").as_deref(),
            Some("aa:bb:cc:dd:ee:ff")
        );
    }

    #[test]
    fn normalize_mac_rejects_zero_and_malformed() {
        assert_eq!(normalize_mac("00:00:00:00:00:00"), None);
        assert_eq!(normalize_mac("aa:bb:cc:dd:ee"), None);
        assert_eq!(normalize_mac("aa:bb:cc:dd:ee:ff:00"), None);
        assert_eq!(normalize_mac("zz:bb:cc:dd:ee:ff"), None);
        assert_eq!(normalize_mac("a:bb:cc:dd:ee:ff"), None);
        assert_eq!(normalize_mac(""), None);
    }

    #[test]
    fn select_mac_skips_virtual_interfaces() {
        let candidates = vec![
            iface("enp0s31f6", "3C:52:82:11:22:33", true),
            iface("br-1a2b3c", "02:42:ac:11:00:01", true),
            iface("docker0", "02:42:ac:11:00:02", true),
            iface("bond0", "02:42:ac:11:00:03", true),
            iface("lo", "00:00:00:00:00:00", true),
        ];
        assert_eq!(select_mac(candidates).as_deref(), Some("3c:52:82:11:22:33"));
    }

    #[test]
    fn select_mac_skips_runtime_assigned_addresses() {
        let candidates = vec![
            iface("eth0", "52:54:00:12:34:56", true),
            iface("ifb0", "6a:1f:00:aa:bb:cc", false),
            iface("eno1", "9e:00:11:22:33:44", false),
        ];
        assert_eq!(select_mac(candidates).as_deref(), Some("52:54:00:12:34:56"));
    }

    #[test]
    fn select_mac_is_independent_of_input_order() {
        let a = vec![
            iface("wlan0", "aa:aa:aa:aa:aa:aa", true),
            iface("eth0", "bb:bb:bb:bb:bb:bb", true),
        ];
        let mut b = a.clone();
        b.reverse();
        assert_eq!(select_mac(a), select_mac(b));
    }

    #[test]
    fn no_usable_interface_omits_mac() {
        let candidates = vec![
            iface("lo", "00:00:00:00:00:00", true),
            iface("docker0", "02:42:ac:11:00:02", true),
            iface("eth0", "00:00:00:00:00:00", true),
            iface("wlan0", "aa:bb:cc:dd:ee:ff", false),
        ];
        let mac = select_mac(candidates);
        assert_eq!(mac, None);
        assert_eq!(select_mac(Vec::new()), None);

        let attrs = DeviceAttributes {
            mac,
            ..DeviceAttributes::collect()
        };
        let fp = attrs.fingerprint();
        assert_eq!(fp.as_str().len(), HardwareFingerprint::LEN);
        assert!(is_lower_hex(fp.as_str()));
    }

    #[test]
    fn fingerprint_rejects_malformed_hex() {
        assert!(HardwareFingerprint::try_from("abc".to_string()).is_err());
        assert!(HardwareFingerprint::try_from("A".repeat(64)).is_err());
        assert!(HardwareFingerprint::try_from("a".repeat(64)).is_ok());
    }

    #[test]
    fn short_never_panics() {
        let fp = HardwareFingerprint("ab".to_string());
        assert_eq!(fp.short(8), "ab");
        let fp = HardwareFingerprint("a".repeat(64));
        assert_eq!(fp.short(8), "aaaaaaaa");
    }

    #[test]
    fn os_release_version_id() {
        let content = "NAME=\"Ubuntu\"\nVERSION_ID=\"22.04\"\nID=ubuntu\n";
        assert_eq!(parse_os_release_version(content).as_deref(), Some("22.04"));
        assert_eq!(parse_os_release_version("ID=arch\n"), None);
    }
}
