//! SFEN Board Parser
//! Splits a position string into board, side to move, hands and move number
//! for display. No move legality is checked.

use thiserror::Error;

pub const BOARD_SIZE: usize = 9;

/// Hand pieces in the order SFEN writes them (black first, then white).
const HAND_ORDER: [char; 14] = [
    'R', 'B', 'G', 'S', 'N', 'L', 'P', 'r', 'b', 'g', 's', 'n', 'l', 'p',
];

#[derive(Error, Debug, PartialEq)]
pub enum SfenError {
    #[error("Empty SFEN string")]
    Empty,
    #[error("Board must have 9 ranks, found {0}")]
    RankCount(usize),
    #[error("Rank {rank} has {files} files")]
    FileCount { rank: usize, files: usize },
    #[error("Unexpected character '{0}' in board")]
    BadBoardChar(char),
    #[error("Unknown side to move '{0}'")]
    BadSide(String),
    #[error("Malformed hand '{0}'")]
    BadHand(String),
    #[error("Malformed move number '{0}'")]
    BadMoveNumber(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Black,
    White,
}

/// A piece on the board. Uppercase letters belong to black (sente).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub letter: char,
    pub promoted: bool,
}

impl Piece {
    pub fn side(&self) -> Side {
        if self.letter.is_ascii_uppercase() {
            Side::Black
        } else {
            Side::White
        }
    }

    /// Short label such as `P` or `+r`.
    pub fn label(&self) -> String {
        if self.promoted {
            format!("+{}", self.letter)
        } else {
            self.letter.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SfenBoard {
    /// Ranks top to bottom; files 9 to 1 left to right.
    pub squares: [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE],
    pub side_to_move: Side,
    pub hands: Vec<(char, u32)>,
    pub move_number: Option<u32>,
}

impl SfenBoard {
    pub fn parse(sfen: &str) -> Result<Self, SfenError> {
        let sfen = sfen.trim();
        let sfen = sfen.strip_prefix("sfen ").unwrap_or(sfen);
        let mut fields = sfen.split_whitespace();

        let board = fields.next().ok_or(SfenError::Empty)?;
        let squares = Self::parse_board(board)?;

        let side_to_move = match fields.next() {
            None | Some("b") => Side::Black,
            Some("w") => Side::White,
            Some(other) => return Err(SfenError::BadSide(other.to_string())),
        };

        let hands = match fields.next() {
            None => Vec::new(),
            Some(hand) => Self::parse_hand(hand)?,
        };

        let move_number = fields
            .next()
            .map(|n| {
                n.parse::<u32>()
                    .map_err(|_| SfenError::BadMoveNumber(n.to_string()))
            })
            .transpose()?;

        Ok(Self {
            squares,
            side_to_move,
            hands,
            move_number,
        })
    }

    fn parse_board(board: &str) -> Result<[[Option<Piece>; BOARD_SIZE]; BOARD_SIZE], SfenError> {
        let ranks: Vec<&str> = board.split('/').collect();
        if ranks.len() != BOARD_SIZE {
            return Err(SfenError::RankCount(ranks.len()));
        }

        let mut squares = [[None; BOARD_SIZE]; BOARD_SIZE];
        for (r, rank) in ranks.iter().enumerate() {
            let mut file = 0usize;
            let mut promoted = false;
            for ch in rank.chars() {
                if let Some(skip) = ch.to_digit(10) {
                    if promoted || skip == 0 {
                        return Err(SfenError::BadBoardChar(ch));
                    }
                    file += skip as usize;
                } else if ch == '+' {
                    promoted = true;
                } else if ch.is_ascii_alphabetic() {
                    if file >= BOARD_SIZE {
                        return Err(SfenError::FileCount {
                            rank: r + 1,
                            files: file + 1,
                        });
                    }
                    squares[r][file] = Some(Piece {
                        letter: ch,
                        promoted,
                    });
                    promoted = false;
                    file += 1;
                } else {
                    return Err(SfenError::BadBoardChar(ch));
                }
            }
            if file != BOARD_SIZE || promoted {
                return Err(SfenError::FileCount {
                    rank: r + 1,
                    files: file,
                });
            }
        }
        Ok(squares)
    }

    fn parse_hand(hand: &str) -> Result<Vec<(char, u32)>, SfenError> {
        if hand == "-" {
            return Ok(Vec::new());
        }

        let mut out: Vec<(char, u32)> = Vec::new();
        let mut count: Option<u32> = None;
        for ch in hand.chars() {
            if let Some(d) = ch.to_digit(10) {
                let next = count
                    .unwrap_or(0)
                    .checked_mul(10)
                    .and_then(|c| c.checked_add(d))
                    .ok_or_else(|| SfenError::BadHand(hand.to_string()))?;
                count = Some(next);
            } else if HAND_ORDER.contains(&ch) {
                out.push((ch, count.take().unwrap_or(1)));
            } else {
                return Err(SfenError::BadHand(hand.to_string()));
            }
        }
        if count.is_some() {
            return Err(SfenError::BadHand(hand.to_string()));
        }
        Ok(out)
    }

    /// Hand pieces held by one side.
    pub fn hand_of(&self, side: Side) -> Vec<(char, u32)> {
        self.hands
            .iter()
            .copied()
            .filter(|(letter, _)| match side {
                Side::Black => letter.is_ascii_uppercase(),
                Side::White => letter.is_ascii_lowercase(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: &str = "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1";

    #[test]
    fn parses_start_position() {
        let board = SfenBoard::parse(START).unwrap();
        assert_eq!(board.side_to_move, Side::Black);
        assert!(board.hands.is_empty());
        assert_eq!(board.move_number, Some(1));
        assert_eq!(board.squares[0][4].unwrap().letter, 'k');
        assert_eq!(board.squares[1][1].unwrap().letter, 'r');
        assert_eq!(board.squares[7][7].unwrap().letter, 'R');
        assert!(board.squares[4][4].is_none());
    }

    #[test]
    fn parses_promotions_and_hands() {
        let sfen = "lnsgkg1nl/1r5s1/pppppp+Bpp/6p2/9/2P6/PP1PPPPPP/7R1/LNSGKGSNL w B2Pp 8";
        let board = SfenBoard::parse(sfen).unwrap();
        let bishop = board.squares[2][6].unwrap();
        assert!(bishop.promoted);
        assert_eq!(bishop.label(), "+B");
        assert_eq!(bishop.side(), Side::Black);
        assert_eq!(board.side_to_move, Side::White);
        assert_eq!(board.hands, vec![('B', 1), ('P', 2), ('p', 1)]);
        assert_eq!(board.hand_of(Side::White), vec![('p', 1)]);
        assert_eq!(board.move_number, Some(8));
    }

    #[test]
    fn accepts_board_only_and_sfen_prefix() {
        let board = SfenBoard::parse("sfen 9/9/9/9/4k4/9/9/9/4K4").unwrap();
        assert_eq!(board.side_to_move, Side::Black);
        assert_eq!(board.move_number, None);
        assert_eq!(board.squares[8][4].unwrap().letter, 'K');
    }

    #[test]
    fn rejects_malformed_boards() {
        assert_eq!(SfenBoard::parse(""), Err(SfenError::Empty));
        assert_eq!(SfenBoard::parse("9/9/9"), Err(SfenError::RankCount(3)));
        assert!(matches!(
            SfenBoard::parse("8/9/9/9/9/9/9/9/9 b - 1"),
            Err(SfenError::FileCount { rank: 1, files: 8 })
        ));
        assert!(matches!(
            SfenBoard::parse("9/9/9/9/9/9/9/9/9 x - 1"),
            Err(SfenError::BadSide(_))
        ));
        assert!(matches!(
            SfenBoard::parse("9/9/9/9/9/9/9/9/9 b 2 1"),
            Err(SfenError::BadHand(_))
        ));
    }

    #[test]
    fn oversized_hand_count_is_rejected() {
        assert_eq!(
            SfenBoard::parse("9/9/9/9/9/9/9/9/9 b 99999999999P 1"),
            Err(SfenError::BadHand("99999999999P".to_string()))
        );
        assert!(matches!(
            SfenBoard::parse("9/9/9/9/9/9/9/9/9 b 1P 99999999999"),
            Err(SfenError::BadMoveNumber(_))
        ));
    }
}
