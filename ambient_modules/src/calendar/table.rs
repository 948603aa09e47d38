// src/calendar/table.rs

use super::{MajorSeason, MicroSeason};

const fn major(
    index: usize,
    name: &'static str,
    reading: &'static str,
    english: &'static str,
    start_month: u32,
    start_day: u32,
) -> MajorSeason {
    MajorSeason { index, name, reading, english, start_month, start_day }
}

const fn micro(
    major_index: usize,
    index: usize,
    name: &'static str,
    reading: &'static str,
    description: &'static str,
) -> MicroSeason {
    MicroSeason { major_index, index, name, reading, description }
}

/// The 24 major seasons, ordered by start date. Anchors follow the
/// 2024-2026 almanac dates and are not recomputed per year.
pub static MAJOR_SEASONS: [MajorSeason; 24] = [
    major(0, "小寒", "shōkan", "Minor Cold", 1, 5),
    major(1, "大寒", "daikan", "Major Cold", 1, 20),
    major(2, "立春", "risshun", "Start of Spring", 2, 4),
    major(3, "雨水", "usui", "Rain Water", 2, 19),
    major(4, "啓蟄", "keichitsu", "Awakening of Insects", 3, 5),
    major(5, "春分", "shunbun", "Spring Equinox", 3, 20),
    major(6, "清明", "seimei", "Clear and Bright", 4, 4),
    major(7, "穀雨", "kokuu", "Grain Rain", 4, 20),
    major(8, "立夏", "rikka", "Start of Summer", 5, 5),
    major(9, "小満", "shōman", "Grain Buds", 5, 21),
    major(10, "芒種", "bōshu", "Grain in Ear", 6, 5),
    major(11, "夏至", "geshi", "Summer Solstice", 6, 21),
    major(12, "小暑", "shōsho", "Minor Heat", 7, 7),
    major(13, "大暑", "taisho", "Major Heat", 7, 22),
    major(14, "立秋", "risshū", "Start of Autumn", 8, 7),
    major(15, "処暑", "shosho", "Limit of Heat", 8, 23),
    major(16, "白露", "hakuro", "White Dew", 9, 7),
    major(17, "秋分", "shūbun", "Autumn Equinox", 9, 23),
    major(18, "寒露", "kanro", "Cold Dew", 10, 8),
    major(19, "霜降", "sōkō", "Frost Descent", 10, 23),
    major(20, "立冬", "rittō", "Start of Winter", 11, 7),
    major(21, "小雪", "shōsetsu", "Minor Snow", 11, 22),
    major(22, "大雪", "taisetsu", "Major Snow", 12, 7),
    major(23, "冬至", "tōji", "Winter Solstice", 12, 22),
];

/// The 72 micro-seasons, three per major season, in calendar order.
pub static MICRO_SEASONS: [MicroSeason; 72] = [
    micro(0, 0, "芹乃栄", "seri sunawachi sakau", "Parsley flourishes"),
    micro(0, 1, "水泉動", "shimizu atataka wo fukumu", "Springs thaw underground"),
    micro(0, 2, "雉始雊", "kiji hajimete naku", "Pheasants start to call"),
    micro(1, 0, "款冬華", "fuki no hana saku", "Butterburs bud"),
    micro(1, 1, "水沢腹堅", "sawamizu kōri tsumeru", "Ice thickens on streams"),
    micro(1, 2, "鶏始乳", "niwatori hajimete toya ni tsuku", "Hens start laying eggs"),
    micro(2, 0, "東風解凍", "harukaze kōri wo toku", "East wind melts the ice"),
    micro(2, 1, "黄鶯睍睆", "uguisu naku", "Bush warblers start singing"),
    micro(2, 2, "魚上氷", "uo kōri wo izuru", "Fish emerge from the ice"),
    micro(3, 0, "土脉潤起", "tsuchi no shō uruoi okoru", "Rain moistens the soil"),
    micro(3, 1, "霞始靆", "kasumi hajimete tanabiku", "Mist starts to linger"),
    micro(3, 2, "草木萌動", "sōmoku mebae izuru", "Grass sprouts, trees bud"),
    micro(4, 0, "蟄虫啓戸", "sugomori mushi to wo hiraku", "Hibernating insects surface"),
    micro(4, 1, "桃始笑", "momo hajimete saku", "First peach blossoms"),
    micro(4, 2, "菜虫化蝶", "namushi chō to naru", "Caterpillars become butterflies"),
    micro(5, 0, "雀始巣", "suzume hajimete sukuu", "Sparrows start to nest"),
    micro(5, 1, "桜始開", "sakura hajimete saku", "First cherry blossoms"),
    micro(5, 2, "雷乃発声", "kaminari sunawachi koe wo hassu", "Distant thunder"),
    micro(6, 0, "玄鳥至", "tsubame kitaru", "Swallows return"),
    micro(6, 1, "鴻雁北", "kōgan kaeru", "Wild geese fly north"),
    micro(6, 2, "虹始見", "niji hajimete arawaru", "First rainbows"),
    micro(7, 0, "葭始生", "ashi hajimete shōzu", "First reeds sprout"),
    micro(7, 1, "霜止出苗", "shimo yamite nae izuru", "Last frost, rice seedlings grow"),
    micro(7, 2, "牡丹華", "botan hana saku", "Peonies bloom"),
    micro(8, 0, "蛙始鳴", "kawazu hajimete naku", "Frogs start singing"),
    micro(8, 1, "蚯蚓出", "mimizu izuru", "Worms surface"),
    micro(8, 2, "竹笋生", "takenoko shōzu", "Bamboo shoots sprout"),
    micro(9, 0, "蚕起食桑", "kaiko okite kuwa wo hamu", "Silkworms feast on mulberry leaves"),
    micro(9, 1, "紅花栄", "benibana sakau", "Safflowers bloom"),
    micro(9, 2, "麦秋至", "mugi no toki itaru", "Wheat ripens for harvest"),
    micro(10, 0, "蟷螂生", "kamakiri shōzu", "Praying mantises hatch"),
    micro(10, 1, "腐草為螢", "kusaretaru kusa hotaru to naru", "Fireflies start to glow"),
    micro(10, 2, "梅子黄", "ume no mi kibamu", "Plums turn yellow"),
    micro(11, 0, "乃東枯", "natsukarekusa karuru", "Self-heal withers"),
    micro(11, 1, "菖蒲華", "ayame hana saku", "Irises bloom"),
    micro(11, 2, "半夏生", "hange shōzu", "Crow-dipper sprouts"),
    micro(12, 0, "温風至", "atsukaze itaru", "Warm winds blow"),
    micro(12, 1, "蓮始開", "hasu hajimete hiraku", "First lotus blossoms"),
    micro(12, 2, "鷹乃学習", "taka sunawachi waza wo narau", "Young hawks learn to fly"),
    micro(13, 0, "桐始結花", "kiri hajimete hana wo musubu", "Paulownia trees set seed"),
    micro(13, 1, "土潤溽暑", "tsuchi uruōte mushiatsushi", "Damp earth, humid air"),
    micro(13, 2, "大雨時行", "taiu tokidoki furu", "Great rains sometimes fall"),
    micro(14, 0, "涼風至", "suzukaze itaru", "Cool winds blow"),
    micro(14, 1, "寒蝉鳴", "higurashi naku", "Evening cicadas sing"),
    micro(14, 2, "蒙霧升降", "fukaki kiri matō", "Thick fog descends"),
    micro(15, 0, "綿柎開", "wata no hanashibe hiraku", "Cotton bolls open"),
    micro(15, 1, "天地始粛", "tenchi hajimete samushi", "The heat starts to die down"),
    micro(15, 2, "禾乃登", "kokumono sunawachi minoru", "Rice ripens"),
    micro(16, 0, "草露白", "kusa no tsuyu shiroshi", "Dew glistens white on grass"),
    micro(16, 1, "鶺鴒鳴", "sekirei naku", "Wagtails sing"),
    micro(16, 2, "玄鳥去", "tsubame saru", "Swallows leave"),
    micro(17, 0, "雷乃収声", "kaminari sunawachi koe wo osamu", "Thunder falls silent"),
    micro(17, 1, "蟄虫坏戸", "mushi kakurete to wo fusagu", "Insects seal their burrows"),
    micro(17, 2, "水始涸", "mizu hajimete karuru", "Farmers drain the fields"),
    micro(18, 0, "鴻雁来", "kōgan kitaru", "Wild geese return"),
    micro(18, 1, "菊花開", "kiku no hana hiraku", "Chrysanthemums bloom"),
    micro(18, 2, "蟋蟀在戸", "kirigirisu to ni ari", "Crickets chirp by the door"),
    micro(19, 0, "霜始降", "shimo hajimete furu", "First frost"),
    micro(19, 1, "霎時施", "kosame tokidoki furu", "Light rains sometimes fall"),
    micro(19, 2, "楓蔦黄", "momiji tsuta kibamu", "Maple leaves and ivy turn yellow"),
    micro(20, 0, "山茶始開", "tsubaki hajimete hiraku", "Sasanqua camellias bloom"),
    micro(20, 1, "地始凍", "chi hajimete kōru", "The land starts to freeze"),
    micro(20, 2, "金盞香", "kinsenka saku", "Daffodils bloom"),
    micro(21, 0, "虹蔵不見", "niji kakurete miezu", "Rainbows hide"),
    micro(21, 1, "朔風払葉", "kitakaze konoha wo harau", "North wind strips the leaves"),
    micro(21, 2, "橘始黄", "tachibana hajimete kibamu", "Tachibana citrus turns yellow"),
    micro(22, 0, "閉塞成冬", "sora samuku fuyu to naru", "Cold sets in, winter begins"),
    micro(22, 1, "熊蟄穴", "kuma ana ni komoru", "Bears start hibernating"),
    micro(22, 2, "鮭魚群", "sake no uo muragaru", "Salmon gather and swim upstream"),
    micro(23, 0, "乃東生", "natsukarekusa shōzu", "Self-heal sprouts"),
    micro(23, 1, "麋角解", "sawashika no tsuno otsuru", "Deer shed their antlers"),
    micro(23, 2, "雪下出麦", "yuki watarite mugi nobiru", "Wheat sprouts under the snow"),
];
