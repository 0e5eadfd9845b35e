use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Kookie 能做这些事：")]
pub enum Command {
    #[command(description = "显示帮助")]
    Help,
    #[command(description = "测测今天的运势（每天一次）")]
    LuckyDay,
    #[command(description = "查询地址坐标：/address <地址> <城市>")]
    Address(String),
    #[command(description = "搜索附近：/nearby <经度,纬度> <关键词> [半径米]")]
    Nearby(String),
    #[command(description = "讲个笑话")]
    Joke,
    #[command(description = "答案之书：/answer <问题>")]
    Answer(String),
}

/// Arguments of `/address`: the last word is the city, everything before it the address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressArgs {
    pub address: String,
    pub city: String,
}

impl AddressArgs {
    pub fn parse(args: &str) -> Result<Self, String> {
        match args.trim().rsplit_once(char::is_whitespace) {
            Some((address, city)) if !address.trim().is_empty() => {
                Ok(Self { address: address.trim().to_string(), city: city.to_string() })
            }
            _ => Err("用法：/address <地址> <城市>".to_string()),
        }
    }
}

/// Arguments of `/nearby`, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NearbyArgs {
    pub location: String,
    pub types: String,
    pub radius: Option<u32>,
}

impl NearbyArgs {
    pub fn parse(args: &str) -> Result<Self, String> {
        let mut parts = args.split_whitespace();
        let (Some(location), Some(types)) = (parts.next(), parts.next()) else {
            return Err("用法：/nearby <经度,纬度> <关键词> [半径米]".to_string());
        };
        let radius = match parts.next() {
            Some(r) => Some(r.parse::<u32>().map_err(|_| format!("半径 '{r}' 不是数字"))?),
            None => None,
        };
        if parts.next().is_some() {
            return Err("参数太多啦".to_string());
        }
        Ok(Self { location: location.to_string(), types: types.to_string(), radius })
    }
}
