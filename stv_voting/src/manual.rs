/*!

This is the long-form manual for `stv_voting` and `stvtally`.

## Counting rules

The count follows a fractional variant of the Single Transferable Vote.

**Quota.** The quota is the total weight of the ballots divided by the number
of seats plus one. It is computed once and never changes, even when ballots
get exhausted. It is not rounded: with 2 ballots and 1 seat, the quota is
exactly 1.

**Candidates.** The candidates are all the names ranked on the ballots, in
the order they are first seen (reading each ballot from its first choice to
its last, one ballot after the other). This order breaks all the ties and is
the order of every report. A name that is never a first choice starts the
count with 0 votes, and may still receive transfers and be elected.

Names are compared exactly: `"Alice"` and `"Alice "` are two candidates.

**Rounds.** At the start of each round, every running candidate whose total is
at least the quota is marked above the quota. If there is any, they are all
elected in candidate order, each one transferring its surplus before the
next one is processed. Otherwise the candidate with the lowest total (the
first one in candidate order on a tie) is eliminated and all its ballots are
transferred at full value.

**Transfers.** The surplus of an elected candidate is its total minus the
quota. Each of its ballots moves to its next running choice with its weight
multiplied by surplus / total. A ballot without any running choice left is
exhausted: its weight leaves the count.

**End.** The count stops between rounds, as soon as there are as many winners
as seats or nobody is running anymore. Since all the candidates above the quota
in a round are elected, a tie on the quota may elect more candidates than
there are seats.

**Wallets.** The ballots held by a candidate are grouped in wallets. Two
ballots with the same remaining running choices share a wallet. The number of
wallets is reported for each candidate.

## Input formats

The following formats are supported by `stvtally`:
* `json` (the default)
* `csv`

### `json`

A list of ballots. The weight is optional and defaults to 1.

```text
[
  {"weight": 2.5, "candidates": ["Alice", "Bob"]},
  {"candidates": ["Bob", "Charlie"]}
]
```

### `csv`

Each row is a ballot, each column (in order) a choice. Empty cells and cells
with only spaces are skipped; other cells are taken as written.

```text
weight,choice 1,choice 2,choice 3
2.5,Alice,Bob,
3.7,Bob,Charlie,
```

The header row and the weight column are optional. See the
[Configuration section](#configuration) to control them.

## Configuration

`stvtally` accepts a configuration file in JSON. Its keys follow the style of
the configuration files of the RCVTab program.

```text
{
  "outputSettings": {
    "contestName": "Board election",
    "outputDirectory": "output"
  },
  "cvrFileSources": [
    {
      "provider": "csv",
      "filePath": "ballots.csv",
      "firstVoteColumnIndex": 2,
      "firstVoteRowIndex": 2,
      "weightColumnIndex": 1
    }
  ],
  "rules": {
    "numberOfWinners": 3
  }
}
```

FileSource:
 - `provider` (`json` or `csv`)
 - `filePath`: relative to the directory of the configuration file.
 - `firstVoteColumnIndex` (number or string, optional): the first column with a
   choice, starting at 1. Defaults to 1. The weight and id columns are never
   read as choices.
 - `firstVoteRowIndex` (number or string, optional): the first row with a
   ballot, starting at 1. Defaults to 2 (one header row).
 - `weightColumnIndex` (number or string, optional): the column with the weight
   of each ballot. If not provided, every ballot has a weight of 1.
 - `idColumnIndex` (number or string, optional): the column with the ballot id,
   used in messages.

Column indexes may also be given as Excel-style letters (`"A"`, `"B"`, ...).

 */
