// Raffle client - Display helpers
use crate::address::Address;

/// Wei per ether
pub const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// Shortened address for display, e.g. `0x5aAe...eAed`
pub fn format_address(address: &Address) -> String {
    let full = address.to_checksum();
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// Convert wei to an ether decimal string without trailing zeros
pub fn format_ether(wei: u128) -> String {
    let whole = wei / WEI_PER_ETHER;
    let fraction = wei % WEI_PER_ETHER;
    if fraction == 0 {
        return whole.to_string();
    }
    let fraction = format!("{:018}", fraction);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}

/// Two-digit time unit for countdown display
pub fn format_time_unit(value: u64) -> String {
    format!("{:02}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ether_formatting() {
        assert_eq!(format_ether(0), "0");
        assert_eq!(format_ether(WEI_PER_ETHER), "1");
        assert_eq!(format_ether(10_000_000_000_000_000), "0.01");
        assert_eq!(format_ether(1_500_000_000_000_000_001), "1.500000000000000001");
    }

    #[test]
    fn address_formatting() {
        let address: Address = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed".parse().unwrap();
        assert_eq!(format_address(&address), "0x5aAe...eAed");
    }
}
