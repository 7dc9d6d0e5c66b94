use std::borrow::Cow;
use std::fmt;

use diag_models::{ForceType, IfaceConfig, PingOption, ProtocolType};
use itertools::Itertools;
use log::error;

use super::{DiagError, DiagResult, Params};

const MILLIS_PER_SEC: f64 = 1000.0;

const PING_OPTION_IPV4: &str = "-4";
const PING_OPTION_IPV6: &str = "-6";
const PING_OPTION_SOURCE: &str = "-I";
const PING_OPTION_FLOOD: &str = "-f";
const PING_OPTION_COUNT: &str = "-c";
const PING_OPTION_INTERVAL: &str = "-i";
const PING_OPTION_MARK: &str = "-m";
const PING_OPTION_SIZE: &str = "-s";
const PING_OPTION_TTL: &str = "-t";
const PING_OPTION_TIMEOUT: &str = "-W";
const PING_OPTION_DURATION: &str = "-w";

const NETSTAT_OPTION_ROUTE_TABLE: &str = "-re";
const NETSTAT_OPTION_ALL_SOCKETS: &str = "-ae";
const NETSTAT_OPTION_TCP_SOCKETS: &str = "-atep";
const NETSTAT_OPTION_UDP_SOCKETS: &str = "-auep";
const NETSTAT_OPTION_UNIX_SOCKETS: &str = "-axe";
const NETSTAT_OPTION_RAW_SOCKETS: &str = "-arep";

const IFCONFIG_OPTION_ALL_IFACE: &str = "-a";
const IFCONFIG_OPTION_ADD_IPV6: &str = "add";
const IFCONFIG_OPTION_DEL_IPV6: &str = "del";
const IFCONFIG_OPTION_DEL_IPV4: &str = "default";
const IFCONFIG_OPTION_SET_IPV4_BCAST: &str = "broadcast";
const IFCONFIG_OPTION_SET_IPV4_MASK: &str = "netmask";
const IFCONFIG_OPTION_SET_MTU_LEN: &str = "mtu";
const IFCONFIG_OPTION_SET_TX_QUEUE_LEN: &str = "txqueuelen";
const IFCONFIG_OPTION_IFACE_UP: &str = "up";
const IFCONFIG_OPTION_IFACE_DOWN: &str = "down";

/// A program with its arguments, executed directly without a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        CommandLine { program: program.into(), args: vec![] }
    }

    pub fn arg(&mut self, arg: impl Into<String>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn is_empty(&self) -> bool {
        self.program.trim().is_empty()
    }
}

/// Quotes arguments that a shell would split or mangle.
impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = std::iter::once(&self.program).chain(&self.args);
        write!(f, "{}", parts.map(|part| quoted(part)).join(" "))
    }
}

fn quoted(part: &str) -> Cow<'_, str> {
    let needs_quotes = part.is_empty()
        || part.chars().any(|c| c.is_whitespace() || matches!(c, '\'' | '"' | '\\'));
    if needs_quotes {
        Cow::Owned(format!("'{}'", part.replace('\'', r"'\''")))
    } else {
        Cow::Borrowed(part)
    }
}

/// Knows where the diagnostic binaries live and which flags they expect.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    ping_path: String,
    netstat_path: String,
    ifconfig_path: String,
}

impl CommandBuilder {
    pub fn new(params: &Params) -> Self {
        CommandBuilder {
            ping_path: params.ping_path.to_string(),
            netstat_path: params.netstat_path.to_string(),
            ifconfig_path: params.ifconfig_path.to_string(),
        }
    }

    /// Flags appear in a fixed order; zero or empty optional fields are left out entirely.
    pub fn build_ping_command(&self, option: &PingOption) -> DiagResult<CommandLine> {
        if option.destination.is_empty() {
            error!("Ping destination is empty.");
            return Err(DiagError::InvalidParameter("ping destination is empty".to_string()));
        }
        let mut cmd = CommandLine::new(&self.ping_path);
        cmd.arg(match option.force_type {
            ForceType::Ipv6 => PING_OPTION_IPV6,
            ForceType::Ipv4 => PING_OPTION_IPV4,
        });
        if !option.source.is_empty() {
            cmd.arg(PING_OPTION_SOURCE).arg(&option.source);
        }
        if option.flood {
            cmd.arg(PING_OPTION_FLOOD);
        }
        push_nonzero(&mut cmd, PING_OPTION_COUNT, option.count as u32);
        if option.interval_ms != 0 {
            let interval_secs = option.interval_ms as f64 / MILLIS_PER_SEC;
            cmd.arg(PING_OPTION_INTERVAL).arg(format!("{:.1}", interval_secs));
        }
        push_nonzero(&mut cmd, PING_OPTION_MARK, option.mark as u32);
        push_nonzero(&mut cmd, PING_OPTION_SIZE, option.data_size as u32);
        push_nonzero(&mut cmd, PING_OPTION_TTL, option.ttl as u32);
        push_nonzero(&mut cmd, PING_OPTION_TIMEOUT, option.timeout_secs as u32);
        cmd.arg(PING_OPTION_DURATION)
            .arg(option.effective_duration_secs().to_string())
            .arg(&option.destination);
        Ok(cmd)
    }

    pub fn build_route_table_command(&self) -> CommandLine {
        let mut cmd = CommandLine::new(&self.netstat_path);
        cmd.arg(NETSTAT_OPTION_ROUTE_TABLE);
        cmd
    }

    pub fn build_sockets_command(&self, protocol: ProtocolType) -> CommandLine {
        let mut cmd = CommandLine::new(&self.netstat_path);
        cmd.arg(match protocol {
            ProtocolType::All => NETSTAT_OPTION_ALL_SOCKETS,
            ProtocolType::Tcp => NETSTAT_OPTION_TCP_SOCKETS,
            ProtocolType::Udp => NETSTAT_OPTION_UDP_SOCKETS,
            ProtocolType::Unix => NETSTAT_OPTION_UNIX_SOCKETS,
            ProtocolType::Raw => NETSTAT_OPTION_RAW_SOCKETS,
        });
        cmd
    }

    /// An empty name queries all interfaces.
    pub fn build_interface_config_command(&self, iface_name: &str) -> CommandLine {
        let mut cmd = CommandLine::new(&self.ifconfig_path);
        if iface_name.is_empty() {
            cmd.arg(IFCONFIG_OPTION_ALL_IFACE);
        } else {
            cmd.arg(iface_name);
        }
        cmd
    }

    /// Applies the set fields of `config` (`add`), or removes its addresses (`!add`).
    ///
    /// Removal only looks at the addresses: the IPv4 address is reset if `config` carries
    /// one at all, IPv6 addresses are deleted one by one. To undo an earlier add, pass the
    /// same config again.
    pub fn build_interface_update_command(
        &self,
        config: &IfaceConfig,
        iface_name: &str,
        add: bool,
    ) -> DiagResult<CommandLine> {
        let mut cmd = self.ifconfig_for(iface_name)?;
        let ipv6_addrs = config.ipv6_addrs.iter()
            .map(|(addr, _scope)| addr)
            .filter(|addr| !addr.is_empty());
        if add {
            if !config.ipv4_addr.is_empty() {
                cmd.arg(&config.ipv4_addr);
            }
            for addr in ipv6_addrs {
                cmd.arg(IFCONFIG_OPTION_ADD_IPV6).arg(addr);
            }
            push_nonempty(&mut cmd, IFCONFIG_OPTION_SET_IPV4_BCAST, &config.ipv4_bcast);
            push_nonempty(&mut cmd, IFCONFIG_OPTION_SET_IPV4_MASK, &config.ipv4_mask);
            push_nonzero(&mut cmd, IFCONFIG_OPTION_SET_MTU_LEN, config.mtu);
            push_nonzero(&mut cmd, IFCONFIG_OPTION_SET_TX_QUEUE_LEN, config.tx_queue_len);
        } else {
            if !config.ipv4_addr.is_empty() {
                cmd.arg(IFCONFIG_OPTION_DEL_IPV4);
            }
            for addr in ipv6_addrs {
                cmd.arg(IFCONFIG_OPTION_DEL_IPV6).arg(addr);
            }
        }
        Ok(cmd)
    }

    pub fn build_interface_active_state_command(&self, iface_name: &str, up: bool) -> DiagResult<CommandLine> {
        let mut cmd = self.ifconfig_for(iface_name)?;
        cmd.arg(if up { IFCONFIG_OPTION_IFACE_UP } else { IFCONFIG_OPTION_IFACE_DOWN });
        Ok(cmd)
    }

    fn ifconfig_for(&self, iface_name: &str) -> DiagResult<CommandLine> {
        if iface_name.trim().is_empty() {
            error!("Interface name is empty.");
            return Err(DiagError::InvalidParameter("interface name is empty".to_string()));
        }
        let mut cmd = CommandLine::new(&self.ifconfig_path);
        cmd.arg(iface_name);
        Ok(cmd)
    }
}

fn push_nonzero(cmd: &mut CommandLine, flag: &str, value: u32) {
    if value != 0 {
        cmd.arg(flag).arg(value.to_string());
    }
}

fn push_nonempty(cmd: &mut CommandLine, flag: &str, value: &str) {
    if !value.is_empty() {
        cmd.arg(flag).arg(value);
    }
}

#[cfg(test)]
mod tests {
    use assertor::*;

    use crate::test_utils::default_builder;

    use super::*;

    fn ping_cmd(option: PingOption) -> String {
        default_builder()
            .build_ping_command(&option)
            .expect("valid ping option")
            .to_string()
    }

    #[test]
    fn ping_minimal() {
        // given
        let option = PingOption::to("127.0.0.1");

        // when
        let cmd = ping_cmd(option);

        // then
        assert_that!(cmd).is_equal_to("/system/bin/ping -4 -w 30 127.0.0.1".to_string());
    }

    #[test]
    fn ping_all_flags_in_order() {
        // given
        let option = PingOption {
            force_type: ForceType::Ipv6,
            destination: "fe80::1".to_string(),
            source: "wlan0".to_string(),
            interval_ms: 1500,
            count: 10,
            data_size: 256,
            mark: 1,
            ttl: 240,
            timeout_secs: 1,
            duration_secs: 10,
            flood: true,
        };

        // when
        let cmd = ping_cmd(option);

        // then
        assert_that!(cmd).is_equal_to(
            "/system/bin/ping -6 -I wlan0 -f -c 10 -i 1.5 -m 1 -s 256 -t 240 -W 1 -w 10 fe80::1"
                .to_string(),
        );
    }

    #[test]
    fn ping_scenario_count_and_timeout() {
        // given
        let option = PingOption { count: 4, timeout_secs: 1, ..PingOption::to("127.0.0.1") };

        // when
        let cmd = ping_cmd(option);

        // then
        assert_that!(cmd).is_equal_to("/system/bin/ping -4 -c 4 -W 1 -w 30 127.0.0.1".to_string());
    }

    #[test]
    fn ping_interval_keeps_one_decimal() {
        // given
        let option = PingOption { interval_ms: 3, ..PingOption::to("::1") };

        // when
        let cmd = ping_cmd(option);

        // then
        assert_that!(cmd).is_equal_to("/system/bin/ping -4 -i 0.0 -w 30 ::1".to_string());
    }

    #[test]
    fn ping_duration_over_max_is_clamped() {
        // given
        let option = PingOption { duration_secs: 31, ..PingOption::to("::1") };

        // when
        let cmd = ping_cmd(option);

        // then
        assert_that!(cmd.ends_with("-w 30 ::1")).is_true();
    }

    #[test]
    fn ping_without_destination_is_rejected() {
        // given
        let option = PingOption { count: 3, ..Default::default() };

        // when
        let res = default_builder().build_ping_command(&option);

        // then
        assert_that!(matches!(res, Err(DiagError::InvalidParameter(_)))).is_true();
    }

    #[test]
    fn socket_flags_per_protocol() {
        let builder = default_builder();
        let cases = [
            (ProtocolType::All, "-ae"),
            (ProtocolType::Tcp, "-atep"),
            (ProtocolType::Udp, "-auep"),
            (ProtocolType::Unix, "-axe"),
            (ProtocolType::Raw, "-arep"),
        ];
        for (protocol, flag) in cases {
            assert_that!(builder.build_sockets_command(protocol).to_string())
                .is_equal_to(format!("/system/bin/netstat {}", flag));
        }
    }

    #[test]
    fn route_table_and_iface_queries() {
        let builder = default_builder();
        assert_that!(builder.build_route_table_command().to_string())
            .is_equal_to("/system/bin/netstat -re".to_string());
        assert_that!(builder.build_interface_config_command("").to_string())
            .is_equal_to("/system/bin/ifconfig -a".to_string());
        assert_that!(builder.build_interface_config_command("wlan0").to_string())
            .is_equal_to("/system/bin/ifconfig wlan0".to_string());
    }

    fn full_config() -> IfaceConfig {
        IfaceConfig {
            ipv4_addr: "192.168.1.10".to_string(),
            ipv4_bcast: "192.168.1.255".to_string(),
            ipv4_mask: "255.255.255.0".to_string(),
            ipv6_addrs: vec![
                ("fd00::10/64".to_string(), "Global".to_string()),
                (String::new(), "Link".to_string()),
            ],
            mtu: 1400,
            tx_queue_len: 500,
            ..Default::default()
        }
    }

    #[test]
    fn iface_update_add() {
        // given
        let config = full_config();

        // when
        let cmd = default_builder().build_interface_update_command(&config, "eth0", true);

        // then
        assert_that!(cmd.unwrap().to_string()).is_equal_to(
            "/system/bin/ifconfig eth0 192.168.1.10 add fd00::10/64 broadcast 192.168.1.255 \
             netmask 255.255.255.0 mtu 1400 txqueuelen 500"
                .to_string(),
        );
    }

    #[test]
    fn iface_update_remove() {
        // given
        let config = full_config();

        // when
        let cmd = default_builder().build_interface_update_command(&config, "eth0", false);

        // then
        assert_that!(cmd.unwrap().to_string())
            .is_equal_to("/system/bin/ifconfig eth0 default del fd00::10/64".to_string());
    }

    #[test]
    fn iface_update_skips_absent_fields() {
        // given
        let config = IfaceConfig { mtu: 9000, ..Default::default() };

        // when
        let added = default_builder().build_interface_update_command(&config, "eth0", true);
        let removed = default_builder().build_interface_update_command(&config, "eth0", false);

        // then
        assert_that!(added.unwrap().to_string())
            .is_equal_to("/system/bin/ifconfig eth0 mtu 9000".to_string());
        assert_that!(removed.unwrap().to_string())
            .is_equal_to("/system/bin/ifconfig eth0".to_string());
    }

    #[test]
    fn iface_active_state() {
        let builder = default_builder();
        assert_that!(builder.build_interface_active_state_command("eth1", true).unwrap().to_string())
            .is_equal_to("/system/bin/ifconfig eth1 up".to_string());
        assert_that!(builder.build_interface_active_state_command("eth1", false).unwrap().to_string())
            .is_equal_to("/system/bin/ifconfig eth1 down".to_string());
        assert_that!(builder.build_interface_active_state_command(" ", false)).is_err();
    }

    #[test]
    fn command_line_parts() {
        // given
        let mut cmd = CommandLine::new("/bin/echo");

        // when
        cmd.arg("a").arg("b c");

        // then
        assert_that!(cmd.program()).is_equal_to("/bin/echo");
        assert_that!(cmd.args().to_vec()).is_equal_to(vec!["a".to_string(), "b c".to_string()]);
        assert_that!(cmd.is_empty()).is_false();
        assert_that!(CommandLine::new("").is_empty()).is_true();
    }

    #[test]
    fn rendering_quotes_arguments_with_whitespace() {
        // given
        let option = PingOption { source: "my iface".to_string(), ..PingOption::to("10.0.0.1") };
        let mut odd = CommandLine::new("/bin/echo");
        odd.arg("it's").arg("").arg("plain");

        // when
        let ping = ping_cmd(option);
        let rendered = odd.to_string();

        // then
        assert_that!(ping.contains("-I 'my iface' ")).is_true();
        assert_that!(rendered).is_equal_to(r"/bin/echo 'it'\''s' '' plain".to_string());
    }
}
