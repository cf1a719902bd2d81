use crate::utils::error::{Result, ToolError};
use crate::utils::validation::validate_finite_result;
use std::f64::consts::PI;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    Length,
    Mass,
    Area,
    Volume,
    Speed,
    Time,
    DataStorage,
    Energy,
    Pressure,
    Power,
    Angle,
    Frequency,
    Temperature,
}

/// 一個單位相對於基準單位的倍率
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit {
    pub id: &'static str,
    pub symbol: &'static str,
    pub factor: f64,
}

const fn unit(id: &'static str, symbol: &'static str, factor: f64) -> Unit {
    Unit { id, symbol, factor }
}

// 基準：公尺
const LENGTH: &[Unit] = &[
    unit("nanometer", "nm", 1e-9),
    unit("micrometer", "µm", 1e-6),
    unit("millimeter", "mm", 1e-3),
    unit("centimeter", "cm", 1e-2),
    unit("meter", "m", 1.0),
    unit("kilometer", "km", 1e3),
    unit("inch", "in", 0.0254),
    unit("foot", "ft", 0.3048),
    unit("yard", "yd", 0.9144),
    unit("mile", "mi", 1609.344),
    unit("nautical-mile", "nmi", 1852.0),
];

// 基準：公斤
const MASS: &[Unit] = &[
    unit("microgram", "µg", 1e-9),
    unit("milligram", "mg", 1e-6),
    unit("gram", "g", 1e-3),
    unit("kilogram", "kg", 1.0),
    unit("tonne", "t", 1e3),
    unit("ounce", "oz", 0.028_349_523_125),
    unit("pound", "lb", 0.453_592_37),
    unit("stone", "st", 6.350_293_18),
    unit("us-ton", "ton", 907.184_74),
];

// 基準：平方公尺
const AREA: &[Unit] = &[
    unit("square-millimeter", "mm²", 1e-6),
    unit("square-centimeter", "cm²", 1e-4),
    unit("square-meter", "m²", 1.0),
    unit("hectare", "ha", 1e4),
    unit("square-kilometer", "km²", 1e6),
    unit("square-inch", "in²", 0.000_645_16),
    unit("square-foot", "ft²", 0.092_903_04),
    unit("square-yard", "yd²", 0.836_127_36),
    unit("acre", "ac", 4_046.856_422_4),
    unit("square-mile", "mi²", 2_589_988.110_336),
];

// 基準：公升
const VOLUME: &[Unit] = &[
    unit("milliliter", "ml", 1e-3),
    unit("cubic-centimeter", "cm³", 1e-3),
    unit("liter", "l", 1.0),
    unit("cubic-meter", "m³", 1e3),
    unit("teaspoon", "tsp", 0.004_928_921_593_75),
    unit("tablespoon", "tbsp", 0.014_786_764_781_25),
    unit("fluid-ounce", "fl-oz", 0.029_573_529_562_5),
    unit("cup", "cup", 0.236_588_236_5),
    unit("pint", "pt", 0.473_176_473),
    unit("quart", "qt", 0.946_352_946),
    unit("gallon", "gal", 3.785_411_784),
    unit("imperial-gallon", "imp-gal", 4.546_09),
    unit("cubic-inch", "in³", 0.016_387_064),
    unit("cubic-foot", "ft³", 28.316_846_592),
];

// 基準：公尺/秒
const SPEED: &[Unit] = &[
    unit("meter-per-second", "m/s", 1.0),
    unit("kilometer-per-hour", "km/h", 1.0 / 3.6),
    unit("mile-per-hour", "mph", 0.447_04),
    unit("foot-per-second", "ft/s", 0.3048),
    unit("knot", "kn", 1852.0 / 3600.0),
];

// 基準：秒；月與年取格里曆平均長度
const TIME: &[Unit] = &[
    unit("nanosecond", "ns", 1e-9),
    unit("microsecond", "µs", 1e-6),
    unit("millisecond", "ms", 1e-3),
    unit("second", "s", 1.0),
    unit("minute", "min", 60.0),
    unit("hour", "h", 3_600.0),
    unit("day", "d", 86_400.0),
    unit("week", "wk", 604_800.0),
    unit("month", "mo", 2_629_746.0),
    unit("year", "yr", 31_556_952.0),
];

// 基準：位元組
const DATA_STORAGE: &[Unit] = &[
    unit("bit", "b", 0.125),
    unit("byte", "B", 1.0),
    unit("kilobyte", "KB", 1e3),
    unit("megabyte", "MB", 1e6),
    unit("gigabyte", "GB", 1e9),
    unit("terabyte", "TB", 1e12),
    unit("petabyte", "PB", 1e15),
    unit("kibibyte", "KiB", 1_024.0),
    unit("mebibyte", "MiB", 1_048_576.0),
    unit("gibibyte", "GiB", 1_073_741_824.0),
    unit("tebibyte", "TiB", 1_099_511_627_776.0),
];

// 基準：焦耳
const ENERGY: &[Unit] = &[
    unit("electronvolt", "eV", 1.602_176_634e-19),
    unit("joule", "J", 1.0),
    unit("kilojoule", "kJ", 1e3),
    unit("calorie", "cal", 4.184),
    unit("kilocalorie", "kcal", 4_184.0),
    unit("watt-hour", "Wh", 3_600.0),
    unit("kilowatt-hour", "kWh", 3.6e6),
    unit("btu", "BTU", 1_055.055_852_62),
    unit("foot-pound", "ft-lbf", 1.355_817_948_331_4),
];

// 基準：帕斯卡
const PRESSURE: &[Unit] = &[
    unit("pascal", "Pa", 1.0),
    unit("kilopascal", "kPa", 1e3),
    unit("megapascal", "MPa", 1e6),
    unit("millibar", "mbar", 100.0),
    unit("bar", "bar", 1e5),
    unit("atmosphere", "atm", 101_325.0),
    unit("psi", "psi", 6_894.757_293_168),
    unit("torr", "Torr", 101_325.0 / 760.0),
    unit("millimeter-of-mercury", "mmHg", 133.322_387_415),
    unit("inch-of-mercury", "inHg", 3_386.389),
];

// 基準：瓦特
const POWER: &[Unit] = &[
    unit("watt", "W", 1.0),
    unit("kilowatt", "kW", 1e3),
    unit("megawatt", "MW", 1e6),
    unit("horsepower", "hp", 745.699_871_582_270_2),
    unit("metric-horsepower", "PS", 735.498_75),
    unit("btu-per-hour", "BTU/h", 0.293_071_070_17),
];

// 基準：弧度
const ANGLE: &[Unit] = &[
    unit("radian", "rad", 1.0),
    unit("degree", "°", PI / 180.0),
    unit("gradian", "grad", PI / 200.0),
    unit("arcminute", "′", PI / 10_800.0),
    unit("arcsecond", "″", PI / 648_000.0),
    unit("turn", "tr", 2.0 * PI),
];

// 基準：赫茲
const FREQUENCY: &[Unit] = &[
    unit("hertz", "Hz", 1.0),
    unit("kilohertz", "kHz", 1e3),
    unit("megahertz", "MHz", 1e6),
    unit("gigahertz", "GHz", 1e9),
    unit("rpm", "rpm", 1.0 / 60.0),
];

// 溫度為仿射換算，factor 欄位不使用
const TEMPERATURE: &[Unit] = &[
    unit("celsius", "°C", 1.0),
    unit("fahrenheit", "°F", 1.0),
    unit("kelvin", "K", 1.0),
    unit("rankine", "°R", 1.0),
];

impl Quantity {
    pub const ALL: [Quantity; 13] = [
        Quantity::Length,
        Quantity::Mass,
        Quantity::Area,
        Quantity::Volume,
        Quantity::Speed,
        Quantity::Time,
        Quantity::DataStorage,
        Quantity::Energy,
        Quantity::Pressure,
        Quantity::Power,
        Quantity::Angle,
        Quantity::Frequency,
        Quantity::Temperature,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Quantity::Length => "length",
            Quantity::Mass => "weight",
            Quantity::Area => "area",
            Quantity::Volume => "volume",
            Quantity::Speed => "speed",
            Quantity::Time => "time",
            Quantity::DataStorage => "data-storage",
            Quantity::Energy => "energy",
            Quantity::Pressure => "pressure",
            Quantity::Power => "power",
            Quantity::Angle => "angle",
            Quantity::Frequency => "frequency",
            Quantity::Temperature => "temperature",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Quantity::Length => "Length",
            Quantity::Mass => "Weight",
            Quantity::Area => "Area",
            Quantity::Volume => "Volume",
            Quantity::Speed => "Speed",
            Quantity::Time => "Time",
            Quantity::DataStorage => "Data Storage",
            Quantity::Energy => "Energy",
            Quantity::Pressure => "Pressure",
            Quantity::Power => "Power",
            Quantity::Angle => "Angle",
            Quantity::Frequency => "Frequency",
            Quantity::Temperature => "Temperature",
        }
    }

    pub fn units(&self) -> &'static [Unit] {
        match self {
            Quantity::Length => LENGTH,
            Quantity::Mass => MASS,
            Quantity::Area => AREA,
            Quantity::Volume => VOLUME,
            Quantity::Speed => SPEED,
            Quantity::Time => TIME,
            Quantity::DataStorage => DATA_STORAGE,
            Quantity::Energy => ENERGY,
            Quantity::Pressure => PRESSURE,
            Quantity::Power => POWER,
            Quantity::Angle => ANGLE,
            Quantity::Frequency => FREQUENCY,
            Quantity::Temperature => TEMPERATURE,
        }
    }

    /// 依 id 或符號查找；id 不分大小寫，符號先精確比對 (b 與 B 不同)
    pub fn find_unit(&self, name: &str) -> Result<&'static Unit> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ToolError::missing("unit"));
        }
        let units = self.units();
        units
            .iter()
            .find(|u| u.id.eq_ignore_ascii_case(name) || u.symbol == name)
            .or_else(|| {
                // 溫度符號可省略度數記號，例如 "C"
                units.iter().find(|u| {
                    u.symbol.eq_ignore_ascii_case(name)
                        || u.symbol.trim_start_matches('°').eq_ignore_ascii_case(name)
                })
            })
            .ok_or_else(|| ToolError::UnknownUnitError {
                quantity: self.slug().to_string(),
                unit: name.to_string(),
            })
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// `value × factor[from] / factor[to]`，溫度則經由克氏溫標
pub fn convert(quantity: Quantity, value: f64, from: &str, to: &str) -> Result<f64> {
    if !value.is_finite() {
        return Err(ToolError::invalid_number("value", &value.to_string()));
    }

    let from_unit = quantity.find_unit(from)?;
    let to_unit = quantity.find_unit(to)?;

    if from_unit.id == to_unit.id {
        if quantity == Quantity::Temperature {
            to_kelvin(value, from_unit.id)?;
        }
        return Ok(value);
    }

    if quantity == Quantity::Temperature {
        let kelvin = to_kelvin(value, from_unit.id)?;
        return validate_finite_result("result", from_kelvin(kelvin, to_unit.id));
    }

    validate_finite_result("result", value * from_unit.factor / to_unit.factor)
}

fn to_kelvin(value: f64, unit_id: &str) -> Result<f64> {
    let kelvin = match unit_id {
        "celsius" => value + 273.15,
        "fahrenheit" => (value + 459.67) * 5.0 / 9.0,
        "rankine" => value * 5.0 / 9.0,
        _ => value,
    };
    // 容許浮點誤差
    if kelvin < -1e-9 {
        return Err(ToolError::out_of_range(
            "value",
            value,
            "temperature is below absolute zero",
        ));
    }
    Ok(kelvin.max(0.0))
}

fn from_kelvin(kelvin: f64, unit_id: &str) -> f64 {
    match unit_id {
        "celsius" => kelvin - 273.15,
        "fahrenheit" => kelvin * 9.0 / 5.0 - 459.67,
        "rankine" => kelvin * 9.0 / 5.0,
        _ => kelvin,
    }
}
