//! Pre-built mock filesystem scenarios for testing.
//!
//! Paths match `MonitorConfig::default()`.

use super::filesystem::MockFs;

/// Header line of `/proc/net/tcp`.
pub const TCP_HEADER: &str = "  sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode\n";
/// Header line of `/proc/net/tcp6`.
pub const TCP6_HEADER: &str = "  sl  local_address                         remote_address                        st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode\n";

/// Formats one connection table row with realistic trailing columns.
pub fn tcp_row(slot: usize, local: &str, remote: &str, state: &str) -> String {
    format!(
        "{:>4}: {} {} {} 00000000:00000000 00:00000000 00000000    31        0 {} 1 0000000000000000 20 4 30 10 -1\n",
        slot,
        local,
        remote,
        state,
        40000 + slot
    )
}

impl MockFs {
    /// A container running the proxy, with traffic on both listening ports.
    ///
    /// Expected collection result:
    /// - http: 3 connections from `192.168.1.10` and `2001:db8::1`
    /// - https: 2 connections from `10.0.0.5` and `192.168.1.13`
    /// - uptime: 11945 seconds with 100 ticks per second
    /// - memory: 100.5 MB
    pub fn squid_host() -> Self {
        let mut fs = Self::new();

        let mut tcp = String::from(TCP_HEADER);
        // LISTEN on 3128
        tcp.push_str(&tcp_row(0, "00000000:0C38", "00000000:0000", "0A"));
        // ESTABLISHED and TIME_WAIT from the same client on 3128
        tcp.push_str(&tcp_row(1, "020011AC:0C38", "0A01A8C0:D431", "01"));
        tcp.push_str(&tcp_row(2, "020011AC:0C38", "0A01A8C0:D432", "06"));
        // ESTABLISHED on 3129
        tcp.push_str(&tcp_row(3, "020011AC:0C39", "0500000A:E001", "01"));
        // loopback health check on 3128
        tcp.push_str(&tcp_row(4, "0100007F:0C38", "0100007F:E002", "01"));
        // SYN_SENT on 3128, not counted
        tcp.push_str(&tcp_row(5, "020011AC:0C38", "0B01A8C0:E003", "02"));
        // unrelated port 80
        tcp.push_str(&tcp_row(6, "020011AC:0050", "0C01A8C0:E004", "01"));
        fs.add_file("/proc/net/tcp", tcp);

        let mut tcp6 = String::from(TCP6_HEADER);
        // CLOSE_WAIT from ::ffff:192.168.1.13 on 3129
        tcp6.push_str(&tcp_row(
            0,
            "0000000000000000FFFF0000020011AC:0C39",
            "0000000000000000FFFF00000D01A8C0:E005",
            "08",
        ));
        // ::1 on 3128
        tcp6.push_str(&tcp_row(
            1,
            "00000000000000000000000001000000:0C38",
            "00000000000000000000000001000000:E006",
            "01",
        ));
        // ::ffff:127.0.0.1 on 3129
        tcp6.push_str(&tcp_row(
            2,
            "0000000000000000FFFF00000100007F:0C39",
            "0000000000000000FFFF00000100007F:E007",
            "01",
        ));
        // 2001:db8::1 on 3128
        tcp6.push_str(&tcp_row(
            3,
            "00000000000000000000000000000000:0C38",
            "B80D0120000000000000000001000000:E008",
            "01",
        ));
        fs.add_file("/proc/net/tcp6", tcp6);

        fs.add_file("/proc/uptime", "12345.67 45678.90\n");
        fs.add_proxy_process(
            "/var/run/squid.pid",
            812,
            "812 (squid) S 1 812 812 0 -1 4194560 2000 0 0 0 150 80 0 0 20 0 1 0 40000 123456789 5000 18446744073709551615 1 1 0 0 0 0 0 4096 16387 0 0 0 17 0 0 0 0 0 0 0 0 0 0 0 0 0 0\n",
        );
        fs.add_file("/sys/fs/cgroup/memory.current", "105381888\n");

        fs
    }

    /// A host where the proxy has never run: no connection tables, no PID
    /// file, no cgroup counters.
    pub fn empty_host() -> Self {
        let mut fs = Self::new();
        fs.add_file("/proc/uptime", "100.00 200.00\n");
        fs
    }
}
