//! 定义了数据承载状态机的可配置参数。
//! Defines configurable parameters for the data bearer state machine.

/// A structure containing all configurable parameters for a bearer instance.
///
/// 包含承载实例所有可配置参数的结构体。
#[derive(Debug, Clone)]
pub struct Config {
    /// Capacity of the bounded mailbox between handles and the bearer actor.
    /// 句柄与承载actor之间有界邮箱的容量。
    pub mailbox_capacity: usize,

    /// The lowest radio response version whose status can be trusted when it
    /// is attached to a failed setup command. Failed commands with an older
    /// response, or none, need an explicit "fetch last failure cause" round
    /// trip.
    ///
    /// 失败的建立命令所附带应答中，状态可信的最低无线电响应版本。
    /// 附带旧版本应答或无应答的失败命令需要额外的“获取最后失败原因”往返。
    pub min_structured_status_version: i32,

    /// Prefix used to build the bearer's log name (`"{prefix}-{id}"`).
    /// 用于构建承载日志名称的前缀。
    pub name_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mailbox_capacity: 128,
            min_structured_status_version: 4,
            name_prefix: "DC".to_string(),
        }
    }
}

impl Config {
    /// Builds the log name for the bearer with the given id.
    /// 为给定id的承载构建日志名称。
    pub fn bearer_name(&self, id: u32) -> String {
        format!("{}-{}", self.name_prefix, id)
    }
}
